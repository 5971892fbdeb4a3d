//! Saved candidate lists
//!
//! Two formats are read: `score,url` CSV rows (no header, url quoted when it
//! contains a comma) and a JSON array of `{"score": .., "url": ..}` objects.
//! Lists are always written as CSV.
//!
//! The CSV reader handles only this two-column layout. Either field may be
//! wrapped in double quotes, but a score must still be a plain integer and
//! multi-line quoted fields are not supported. Scores above 100 are clamped.

use crate::error::{CliError, Result};
use dossier_domain::CandidateMatch;
use std::fs;
use std::path::Path;

/// Read a candidate file, choosing the format by extension
/// (`.json` is JSON, anything else CSV).
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateMatch>> {
    let contents = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        parse_csv(&contents)
    }
}

/// Parse `score,url` rows. Blank lines are skipped.
pub fn parse_csv(contents: &str) -> Result<Vec<CandidateMatch>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_row(line).map_err(|e| CliError::InvalidInput(format!("line {}: {}", idx + 1, e))))
        .collect()
}

fn parse_row(line: &str) -> std::result::Result<CandidateMatch, String> {
    let (score, url) = line
        .split_once(',')
        .ok_or_else(|| "expected `score,url`".to_string())?;
    let score = unquote(score.trim());
    let score: u32 = score
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{}'", score.trim()))?;

    let url = unquote(url.trim());
    if url.is_empty() {
        return Err("empty url".to_string());
    }
    Ok(CandidateMatch::new(score, url))
}

fn unquote(field: &str) -> String {
    match field.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

/// Render candidates as CSV rows.
pub fn to_csv(candidates: &[CandidateMatch]) -> String {
    candidates
        .iter()
        .map(|c| {
            let url = if c.url.contains(',') || c.url.contains('"') {
                format!("\"{}\"", c.url.replace('"', "\"\""))
            } else {
                c.url.clone()
            };
            format!("{},{}\n", c.score, url)
        })
        .collect()
}
