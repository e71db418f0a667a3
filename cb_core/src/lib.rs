#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod store;
pub mod structs;
