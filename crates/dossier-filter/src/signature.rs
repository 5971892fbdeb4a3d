//! Builds the lexical signature from the trusted core pages

use crate::tokenize::{is_content_word, tokenize};
use dossier_domain::traits::PageTextProvider;
use dossier_domain::{PageTextCache, Signature};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches core pages and ranks their words
pub struct SignatureBuilder {
    provider: Arc<dyn PageTextProvider>,
    size: usize,
}

impl SignatureBuilder {
    /// Create a builder keeping at most `size` tokens
    pub fn new(provider: Arc<dyn PageTextProvider>, size: usize) -> Self {
        Self { provider, size }
    }

    /// Fetch every url in order and build the signature from their text.
    ///
    /// Text already in `cache` is reused; freshly fetched text is cached.
    /// Failed fetches are skipped. With no text at all the signature is
    /// empty.
    pub async fn build(&self, urls: &[&str], cache: &mut PageTextCache) -> Signature {
        let mut texts = Vec::with_capacity(urls.len());
        for url in urls {
            if let Some(text) = cache.get(url) {
                texts.push(text.to_string());
                continue;
            }
            match self.provider.fetch_text(url).await {
                Some(text) => {
                    cache.insert(*url, text.clone());
                    texts.push(text);
                }
                None => debug!(url, "Core page yielded no text"),
            }
        }

        let signature = signature_from_texts(texts.iter().map(String::as_str), self.size);
        info!(
            pages = urls.len(),
            fetched = texts.len(),
            tokens = signature.len(),
            "Built signature"
        );
        signature
    }
}

/// Rank the content words of `texts` by frequency and keep the top `size`.
///
/// Ties keep the order in which words were first seen.
pub fn signature_from_texts<'a, I>(texts: I, size: usize) -> Signature
where
    I: IntoIterator<Item = &'a str>,
{
    // word -> (count, first seen)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut seen = 0;
    for text in texts {
        for token in tokenize(text) {
            if !is_content_word(&token) {
                continue;
            }
            let entry = counts.entry(token).or_insert((0, seen));
            entry.0 += 1;
            seen += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    Signature::from_ranked(ranked.into_iter().take(size).map(|(word, _, _)| word))
}
