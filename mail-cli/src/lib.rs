//! # mail-cli
//!
//! Admin command line over the captured-mail store: argument parsing, config loading from
//! the environment, and the command handlers.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use commands::run;
pub use config::CliConfig;
