//! Dossier CLI library.
//!
//! This library provides the core functionality for the Dossier command-line interface,
//! including configuration management, candidate files, command execution, and output
//! formatting.

pub mod candidates;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
