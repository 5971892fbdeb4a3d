//! Candidate matches returned by the face-matching service

use serde::{Deserialize, Deserializer, Serialize};

/// A page on which the face-matching service found the subject's face
///
/// `score` and `url` never change once produced. `page_text` is a lazily
/// filled cache slot and may be written at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// Match score in `0..=100`
    #[serde(deserialize_with = "clamped_score")]
    pub score: u8,

    /// Page the face was found on
    pub url: String,

    /// Visible text of the page, once fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_text: Option<String>,
}

impl CandidateMatch {
    /// Create a candidate, clamping the score into `0..=100`
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::CandidateMatch;
    ///
    /// let c = CandidateMatch::new(120, "https://example.com");
    /// assert_eq!(c.score, 100);
    /// assert!(c.page_text().is_none());
    /// ```
    pub fn new(score: u32, url: impl Into<String>) -> Self {
        Self {
            score: score.min(100) as u8,
            url: url.into(),
            page_text: None,
        }
    }

    /// Cached page text, if any
    pub fn page_text(&self) -> Option<&str> {
        self.page_text.as_deref()
    }

    /// Fill the page text slot.
    ///
    /// Returns `false` (and leaves the existing text untouched) if the slot
    /// was already filled.
    pub fn set_page_text(&mut self, text: String) -> bool {
        if self.page_text.is_some() {
            return false;
        }
        self.page_text = Some(text);
        true
    }
}

// Scores above 100 from cached files are clamped like `CandidateMatch::new`.
fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u32::deserialize(deserializer)?;
    Ok(raw.min(100) as u8)
}

/// Sort candidates by descending score.
///
/// The sort is stable, so candidates with equal scores keep the order the
/// service returned them in.
pub fn sort_by_score_desc(candidates: &mut [CandidateMatch]) {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Partition of a score-sorted candidate list
///
/// `core` is always a prefix of the sorted input and `tail` is the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreCluster {
    /// High-confidence prefix, trusted without verification
    pub core: Vec<CandidateMatch>,

    /// Remaining candidates, each verified individually
    pub tail: Vec<CandidateMatch>,
}

impl ScoreCluster {
    /// Urls of the core candidates, in rank order
    pub fn core_urls(&self) -> Vec<&str> {
        self.core.iter().map(|c| c.url.as_str()).collect()
    }

    /// Lowest score in the core, if the core is non-empty
    pub fn core_floor(&self) -> Option<u8> {
        self.core.last().map(|c| c.score)
    }
}
