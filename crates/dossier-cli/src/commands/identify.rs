//! Identify command implementation.

use crate::cli::IdentifyArgs;
use crate::commands::run::execute_run;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use dossier_pipeline::RunInput;
use std::fs;

/// Execute the identify command.
pub async fn execute_identify(args: IdentifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let image = fs::read(&args.image)?;
    if image.is_empty() {
        return Err(CliError::InvalidInput(format!("{} is empty", args.image.display())));
    }

    eprintln!("{}", formatter.info(&format!("Identifying {}", args.image.display())));
    execute_run(RunInput::Image(image), config, formatter).await
}
