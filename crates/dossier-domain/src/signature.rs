//! Lexical fingerprint of the trusted core pages

use std::collections::HashSet;

/// Maximum number of tokens a signature may hold
pub const MAX_SIGNATURE_TOKENS: usize = 50;

/// Set of frequent words summarizing the subject's core pages
///
/// Tokens are lowercase, alphabetic-only, longer than two characters, and
/// unique. The signature is built once per run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    ranked: Vec<String>,
    index: HashSet<String>,
}

impl Signature {
    /// Build a signature from tokens ranked most frequent first.
    ///
    /// Tokens that break the signature invariants are skipped, duplicates
    /// keep their first rank, and at most [`MAX_SIGNATURE_TOKENS`] are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::Signature;
    ///
    /// let sig = Signature::from_ranked(["engineer", "seattle", "EX", "acme", "engineer"]);
    /// assert_eq!(sig.len(), 3);
    /// assert!(sig.contains("acme"));
    /// ```
    pub fn from_ranked<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranked = Vec::new();
        let mut index = HashSet::new();
        for token in tokens {
            if ranked.len() == MAX_SIGNATURE_TOKENS {
                break;
            }
            let token = token.into();
            if !is_signature_token(&token) || index.contains(&token) {
                continue;
            }
            index.insert(token.clone());
            ranked.push(token);
        }
        Self { ranked, index }
    }

    /// An empty signature; no page ever matches it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `token` is part of the signature
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    /// Tokens, most frequent first
    pub fn tokens(&self) -> &[String] {
        &self.ranked
    }

    /// Tokens as an unordered set
    pub fn token_set(&self) -> &HashSet<String> {
        &self.index
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether the signature has no tokens
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

fn is_signature_token(token: &str) -> bool {
    token.len() > 2 && token.chars().all(|c| c.is_ascii_lowercase())
}
