//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dossier CLI - Find out who is in a photo.
#[derive(Debug, Parser)]
#[command(name = "dossier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// FaceCheck.ID API token
    #[arg(long, env = "DOSSIER_FACECHECK_TOKEN", hide_env_values = true, global = true)]
    pub facecheck_token: Option<String>,

    /// Gemini API key
    #[arg(long, env = "DOSSIER_GEMINI_KEY", hide_env_values = true, global = true)]
    pub gemini_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Identify the person in an image
    Identify(IdentifyArgs),

    /// Build a profile from a saved candidate list
    Resolve(ResolveArgs),

    /// Run the face search only and list the candidates
    Search(SearchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the identify command.
#[derive(Debug, Parser)]
pub struct IdentifyArgs {
    /// Image file with the face to search for
    pub image: PathBuf,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Candidate file: `score,url` CSV rows or a JSON array
    pub candidates: PathBuf,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Image file with the face to search for
    pub image: PathBuf,

    /// Save the candidates as CSV for later `resolve` runs
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Log filter implied by `--verbose`
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
