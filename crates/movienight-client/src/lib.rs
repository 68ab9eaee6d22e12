//! Movie night batch scheduler
//!
//! This crate provides the `movienight` command-line interface: it plans one
//! event per film on the first Sunday of consecutive months and submits them
//! to Google Calendar.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod ledger;
pub mod prompt;
pub mod scheduler;
pub mod secret;

#[cfg(test)]
mod testing;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
