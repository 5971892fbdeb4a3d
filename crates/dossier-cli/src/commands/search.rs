//! Search command implementation.

use crate::candidates::to_csv;
use crate::cli::SearchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dossier_domain::sort_by_score_desc;
use dossier_sources::FaceCheckClient;
use std::fs;

/// Execute the search command.
pub async fn execute_search(args: SearchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let image = fs::read(&args.image)?;
    let client = FaceCheckClient::new(config.sources.facecheck.clone())?;

    eprintln!("{}", formatter.info("Running face search"));
    let mut candidates = client.search_face(&image).await?;
    sort_by_score_desc(&mut candidates);

    println!("{}", formatter.format_candidates(&candidates)?);

    if let Some(path) = args.save {
        fs::write(&path, to_csv(&candidates))?;
        eprintln!(
            "{}",
            formatter.success(&format!("Saved {} candidates to {}", candidates.len(), path.display()))
        );
    }

    Ok(())
}
