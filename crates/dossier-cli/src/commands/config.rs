//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, path: &Path, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(path, formatter),
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the configuration with secrets removed.
fn show_config(path: &Path, formatter: &Formatter) -> Result<()> {
    let mut config = Config::load(Some(path))?;
    config.llm.api_key.clear();
    config.sources.facecheck.api_token.clear();

    println!("{}", formatter.info(&format!("Configuration file: {}", path.display())));
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);

        init_config(&path, false, &formatter).unwrap();
        assert!(path.exists());
        assert!(matches!(
            init_config(&path, false, &formatter),
            Err(CliError::InvalidInput(_))
        ));
        assert!(init_config(&path, true, &formatter).is_ok());
    }
}
