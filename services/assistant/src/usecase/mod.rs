pub mod chat;
pub mod issue;
pub mod login;
pub mod register;
pub mod reset;
