mod helpers;

mod ask_test;
mod login_test;
