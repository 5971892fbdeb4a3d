//! Page text cache and the confirmed evidence set

use std::collections::HashMap;

/// Per-run cache of fetched page text, keyed by url
///
/// Each key is written at most once; later writes for the same url are
/// ignored. The cache lets the extraction stage reuse text fetched while
/// building the signature or filtering the tail.
#[derive(Debug, Clone, Default)]
pub struct PageTextCache {
    entries: HashMap<String, String>,
}

impl PageTextCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record text for `url`. Returns `false` if the url was already cached.
    pub fn insert(&mut self, url: impl Into<String>, text: impl Into<String>) -> bool {
        let url = url.into();
        if self.entries.contains_key(&url) {
            return false;
        }
        self.entries.insert(url, text.into());
        true
    }

    /// Cached text for `url`
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// Whether `url` has been cached
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Merge another cache into this one, keeping existing entries on conflict.
    ///
    /// Returns the number of newly inserted urls.
    pub fn merge(&mut self, other: PageTextCache) -> usize {
        other
            .entries
            .into_iter()
            .filter(|(url, text)| self.insert(url.clone(), text.clone()))
            .count()
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a url entered the confirmed evidence set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceOrigin {
    /// Part of the trusted core cluster
    Core,
    /// Tail candidate accepted by overlap classification
    Matched,
    /// Supplementary url found during escalation
    Escalated,
}

impl EvidenceOrigin {
    /// Short lowercase label for logs and output
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceOrigin::Core => "core",
            EvidenceOrigin::Matched => "matched",
            EvidenceOrigin::Escalated => "escalated",
        }
    }
}

/// One accepted url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceEntry {
    /// Face match score; escalation entries carry 0
    pub score: u8,

    /// Source url
    pub url: String,

    /// Which stage accepted the url
    pub origin: EvidenceOrigin,
}

/// Ordered set of urls whose text feeds the profile extractor
///
/// Urls are unique: pushing a url that is already present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ConfirmedEvidence {
    entries: Vec<EvidenceEntry>,
}

impl ConfirmedEvidence {
    /// Create an empty evidence set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a url. Returns `false` if the url was already present.
    pub fn push(&mut self, score: u8, url: impl Into<String>, origin: EvidenceOrigin) -> bool {
        let url = url.into();
        if self.entries.iter().any(|e| e.url == url) {
            return false;
        }
        self.entries.push(EvidenceEntry { score, url, origin });
        true
    }

    /// Add an escalation-derived url (score 0)
    pub fn push_escalated(&mut self, url: impl Into<String>) -> bool {
        self.push(0, url, EvidenceOrigin::Escalated)
    }

    /// Stable sort by descending score
    pub fn sort_by_score(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }

    /// Entries in their current order
    pub fn entries(&self) -> &[EvidenceEntry] {
        &self.entries
    }

    /// Number of entries with the given origin
    pub fn count(&self, origin: EvidenceOrigin) -> usize {
        self.entries.iter().filter(|e| e.origin == origin).count()
    }

    /// Pair each entry with its cached text, skipping urls that were never fetched
    pub fn with_text<'a>(&'a self, cache: &'a PageTextCache) -> Vec<(&'a EvidenceEntry, &'a str)> {
        self.entries
            .iter()
            .filter_map(|e| cache.get(&e.url).map(|text| (e, text)))
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is no evidence at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
