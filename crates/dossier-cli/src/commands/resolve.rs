//! Resolve command implementation.

use crate::candidates::load_candidates;
use crate::cli::ResolveArgs;
use crate::commands::run::execute_run;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dossier_pipeline::RunInput;

/// Execute the resolve command.
pub async fn execute_resolve(args: ResolveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let candidates = load_candidates(&args.candidates)?;
    eprintln!(
        "{}",
        formatter.info(&format!(
            "Loaded {} candidates from {}",
            candidates.len(),
            args.candidates.display()
        ))
    );

    execute_run(RunInput::Candidates(candidates), config, formatter).await
}
