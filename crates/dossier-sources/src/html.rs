//! HTML to visible text

use scraper::{Html, Node};

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text of an HTML document with whitespace collapsed.
///
/// Returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use dossier_sources::visible_text;
///
/// let html = "<html><head><style>p{}</style></head><body><p>Jane  Doe</p>\n<script>x()</script><p>Seattle</p></body></html>";
/// assert_eq!(visible_text(html).as_deref(), Some("Jane Doe Seattle"));
/// ```
pub fn visible_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut words: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_hidden_elements() {
        let html = r#"<body>
            <noscript>Enable JS</noscript>
            <h1>Jane Doe</h1>
            <div>Engineer at <b>Acme</b></div>
        </body>"#;
        assert_eq!(visible_text(html).as_deref(), Some("Jane Doe Engineer at Acme"));
    }

    #[test]
    fn test_empty_document() {
        assert!(visible_text("<html><body><script>var a;</script></body></html>").is_none());
        assert!(visible_text("").is_none());
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(visible_text("<p>Tom &amp; Jerry</p>").as_deref(), Some("Tom & Jerry"));
    }
}
