//! Dossier CLI - Command-line interface for the Dossier identity-resolution pipeline.

use anyhow::Context;
use clap::Parser;
use dossier_cli::commands;
use dossier_cli::config::OutputFormat;
use dossier_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_level());

    let Cli {
        format,
        no_color,
        config: config_arg,
        facecheck_token,
        gemini_key,
        command,
        ..
    } = cli;

    let config_path = match config_arg {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let setup = || -> anyhow::Result<(Config, Formatter)> {
        let mut config = Config::load(Some(&config_path))
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        config.apply_secrets(facecheck_token, gemini_key);

        // Determine output format
        let format = format.map(Into::into).unwrap_or(config.settings.format);

        // Determine color setting
        let color_enabled = !no_color && config.settings.color;

        let formatter = Formatter::new(format, color_enabled);
        Ok((config, formatter))
    };

    match command {
        // Config commands work even when the file is broken
        Command::Config(args) => {
            let format = format.map(Into::into).unwrap_or(OutputFormat::Table);
            let formatter = Formatter::new(format, !no_color);
            commands::execute_config(args, &config_path, &formatter)?;
        }
        Command::Identify(args) => {
            let (config, formatter) = setup()?;
            commands::execute_identify(args, &config, &formatter).await?;
        }
        Command::Resolve(args) => {
            let (config, formatter) = setup()?;
            commands::execute_resolve(args, &config, &formatter).await?;
        }
        Command::Search(args) => {
            let (config, formatter) = setup()?;
            commands::execute_search(args, &config, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr. `--verbose` wins over `RUST_LOG`; without either only
/// warnings are shown.
fn init_tracing(verbose: u8, level: &str) {
    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
