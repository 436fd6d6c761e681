#![forbid(unsafe_code)]
#![warn(
    clippy::unused_async,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::doc_markdown,
    clippy::missing_errors_doc
)]
// Only allow when debugging
// #![allow(unused)]

/// Simple macro to create a new String, or convert from a &str to a String - basically just gets rid of String::from() / .to_owned() etc
#[macro_export]
macro_rules! S {
    () => {
        String::new()
    };
    ($s:expr) => {
        String::from($s)
    };
}

pub mod app_error;
pub mod db_postgres;
pub mod parse_env;

pub use app_error::AppError;
