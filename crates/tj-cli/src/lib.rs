//! Time journal CLI library.
//!
//! This crate provides the CLI interface for the time journal.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, PrefsAction};
pub use config::Config;
