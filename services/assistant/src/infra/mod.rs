pub mod llm;
pub mod mail;
pub mod retry;
pub mod store;
