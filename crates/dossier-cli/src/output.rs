//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use dossier_domain::{CandidateMatch, ProgressEvent};
use dossier_pipeline::RunOutcome;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the result of a run.
    pub fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_outcome_json(outcome),
            OutputFormat::Table => Ok(self.format_outcome_table(outcome)),
        }
    }

    fn format_outcome_json(&self, outcome: &RunOutcome) -> Result<String> {
        let sources: Vec<serde_json::Value> = outcome
            .evidence
            .entries()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "score": e.score,
                    "url": e.url,
                    "origin": e.origin.as_str(),
                })
            })
            .collect();

        let value = serde_json::json!({
            "run_id": outcome.run_id.to_string(),
            "profile": outcome.profile,
            "sources": sources,
            "escalated": outcome.escalated,
            "attempts": outcome.extraction.attempts,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_outcome_table(&self, outcome: &RunOutcome) -> String {
        let profile = &outcome.profile;
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["Name", or_unknown(&profile.name)]);
        builder.push_record(["Profession", or_unknown(&profile.profession)]);
        builder.push_record(["Workplace", or_unknown(&profile.workplace)]);
        builder.push_record(["Email", or_unknown(&profile.email)]);
        builder.push_record(["Phone", or_unknown(&profile.phone)]);
        for (i, fact) in profile.fun_facts.iter().enumerate() {
            let label = if i == 0 { "Facts" } else { "" };
            builder.push_record([label, fact.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        out.push_str("\n\nSources:\n");
        for entry in outcome.evidence.entries() {
            out.push_str(&format!("  [{:>3}] {} ({})\n", entry.score, entry.url, entry.origin.as_str()));
        }
        out
    }

    /// Format a candidate list.
    pub fn format_candidates(&self, candidates: &[CandidateMatch]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(candidates)?),
            OutputFormat::Table => {
                if candidates.is_empty() {
                    return Ok(self.colorize("No candidates found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Score", "URL"]);
                for candidate in candidates {
                    builder.push_record([candidate.score.to_string(), candidate.url.clone()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a progress line.
    pub fn progress(&self, event: &ProgressEvent) -> String {
        self.colorize(&format!("… {}", event.message), "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
