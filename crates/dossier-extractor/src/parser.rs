//! Parse LLM output into a person profile

use crate::error::ExtractorError;
use dossier_domain::{PersonProfile, RAW_RESPONSE_MARKER};
use serde_json::{Map, Value};

/// Parse an LLM response into a validated profile.
///
/// The response must hold a single JSON object, optionally inside a markdown
/// code block or surrounded by prose. A response carrying the raw-response
/// marker is rejected.
pub fn parse_profile_response(response: &str) -> Result<PersonProfile, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;
    let mut obj = match json {
        Value::Object(obj) => obj,
        other => {
            return Err(ExtractorError::InvalidFormat(format!(
                "Expected JSON object, got {}",
                kind(&other)
            )))
        }
    };

    if obj.contains_key(RAW_RESPONSE_MARKER) {
        return Err(ExtractorError::RawResponse);
    }

    drop_nulls(&mut obj);
    let profile: PersonProfile = serde_json::from_value(Value::Object(obj))?;
    Ok(profile)
}

/// Extract the JSON object text, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();

    let body = if trimmed.starts_with("```") {
        let without_open = match trimmed.find('\n') {
            Some(idx) => &trimmed[idx + 1..],
            None => return Err(ExtractorError::InvalidFormat("Empty code block".to_string())),
        };
        without_open
            .trim_end()
            .strip_suffix("```")
            .unwrap_or(without_open)
            .trim()
    } else {
        trimmed
    };

    if body.starts_with('[') {
        return Err(ExtractorError::InvalidFormat(
            "Expected JSON object, got array".to_string(),
        ));
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Err(ExtractorError::InvalidFormat(
            "No JSON object in response".to_string(),
        )),
    }
}

// Models emit `null` for unknown fields; treat those as absent.
fn drop_nulls(obj: &mut Map<String, Value>) {
    obj.retain(|_, v| !v.is_null());
    if let Some(Value::Array(facts)) = obj.get_mut("fun_facts") {
        facts.retain(|f| !f.is_null());
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
