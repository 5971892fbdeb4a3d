//! Signature overlap scoring for a single page

use crate::tokenize::tokenize;
use dossier_domain::Signature;

/// Outcome of scoring one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapVerdict {
    /// Page tokens found in the signature, repeats included
    pub count: usize,

    /// Whether `count` reached the threshold
    pub is_match: bool,
}

/// Decides whether a page is about the signature's subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapClassifier {
    threshold: usize,
}

impl OverlapClassifier {
    /// Classifier matching pages with at least `threshold` signature tokens
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Configured threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Score `text` against `signature`
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::Signature;
    /// use dossier_filter::OverlapClassifier;
    ///
    /// let sig = Signature::from_ranked(["engineer", "seattle", "acme"]);
    /// let verdict = OverlapClassifier::new(5).classify(&sig, "Acme engineer in Seattle");
    /// assert_eq!(verdict.count, 3);
    /// assert!(!verdict.is_match);
    /// ```
    pub fn classify(&self, signature: &Signature, text: &str) -> OverlapVerdict {
        let count = overlap_count(signature, text);
        OverlapVerdict {
            count,
            is_match: count >= self.threshold,
        }
    }
}

impl Default for OverlapClassifier {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Number of tokens of `text` that appear in `signature`, repeats included
pub fn overlap_count(signature: &Signature, text: &str) -> usize {
    if signature.is_empty() {
        return 0;
    }
    tokenize(text)
        .iter()
        .filter(|t| signature.contains(t))
        .count()
}
