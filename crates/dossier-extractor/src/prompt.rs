//! LLM prompt engineering for profile extraction

use crate::types::ExtractionRequest;

/// JSON schema of the profile object the model must return
pub const PROFILE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "name": {"type": "string"},
    "profession": {"type": "string"},
    "workplace": {"type": "string"},
    "email": {"type": "string"},
    "phone": {"type": "string"},
    "fun_facts": {"type": "array", "items": {"type": "string"}}
  },
  "required": ["name", "profession", "workplace", "email", "phone", "fun_facts"]
}"#;

/// Builds prompts for the LLM to extract a person profile
pub struct PromptBuilder<'a> {
    request: &'a ExtractionRequest,
    max_text_length: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(request: &'a ExtractionRequest) -> Self {
        Self {
            request,
            max_text_length: usize::MAX,
        }
    }

    /// Cap the evidence portion of the prompt at `chars` characters
    pub fn with_max_text_length(mut self, chars: usize) -> Self {
        self.max_text_length = chars;
        self
    }

    /// Evidence text, one `SOURCE:` block per page, truncated to the cap
    pub fn evidence_text(&self) -> String {
        let mut blocks: Vec<String> = self
            .request
            .sources
            .iter()
            .map(|s| format!("SOURCE:\n{}", s.text))
            .collect();
        if let Some(supplement) = &self.request.supplement {
            blocks.push(format!("SOURCE:\n{}", supplement));
        }

        let joined = blocks.join("\n\n");
        truncate_chars(&joined, self.max_text_length).to_string()
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Excerpts:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.evidence_text());
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Longest prefix of `text` with at most `max` characters
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You extract factual information about one person from web page excerpts.
The excerpts come from different websites. Determine which individual is mentioned most
frequently; assume this is the person of interest. Ignore excerpts that say nothing about them.

Extract:
- name: the person's full name
- profession: their job title or field
- workplace: their employer, school or organization
- email: a public email address
- phone: a public phone number
- fun_facts: 3 to 5 short, interesting facts about the person

Rules:
- Use ONLY information stated in the excerpts
- Never guess or invent details; leave a field as an empty string when the excerpts do not state it
- If excerpts disagree, prefer the detail most sources agree on"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (a single JSON object only, no additional text):
{
  "name": "",
  "profession": "",
  "workplace": "",
  "email": "",
  "phone": "",
  "fun_facts": ["", "", ""]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
