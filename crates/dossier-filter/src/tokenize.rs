//! Word tokenizer shared by signature building and overlap scoring

/// English stopwords (apostrophe-free forms)
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Url and platform fragments that say nothing about a person
pub const NOISE_WORDS: &[&str] = &["com", "www", "http", "https", "org", "bsky", "app", "profile"];

/// Lowercase `text`, delete every character that is not an ASCII letter or
/// whitespace, and split on whitespace.
///
/// Deleted characters do not split words: `"O'Neil"` becomes `"oneil"`.
///
/// # Examples
///
/// ```
/// use dossier_filter::tokenize;
///
/// assert_eq!(tokenize("Jane's e-mail: J@Acme.com"), vec!["janes", "email", "jacmecom"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Whether a token may enter a signature
pub fn is_content_word(token: &str) -> bool {
    token.len() > 2 && !STOPWORDS.contains(&token) && !NOISE_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_digits_and_punctuation() {
        assert_eq!(
            tokenize("Born 1990 in Seattle, WA!"),
            vec!["born", "in", "seattle", "wa"]
        );
    }

    #[test]
    fn test_tokenize_drops_non_ascii_letters() {
        assert_eq!(tokenize("Zoë Müller"), vec!["zo", "mller"]);
    }

    #[test]
    fn test_tokenize_splits_on_any_whitespace() {
        assert_eq!(tokenize("a\tb\n\nc  d"), vec!["a", "b", "c", "d"]);
        assert!(tokenize("  123 !!! ").is_empty());
    }

    #[test]
    fn test_content_words() {
        assert!(is_content_word("engineer"));
        assert!(!is_content_word("the"));
        assert!(!is_content_word("https"));
        assert!(!is_content_word("wa"));
        assert!(!is_content_word("because"));
    }
}
