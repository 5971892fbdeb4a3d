//! The structured profile produced at the end of a run

use serde::{Deserialize, Serialize};

/// Key a language-model client attaches when it could not parse the model
/// output. A profile carrying it is never a valid result.
pub const RAW_RESPONSE_MARKER: &str = "raw_response";

/// Structured summary of the resolved person
///
/// Fields the sources say nothing about are empty strings rather than
/// missing, so every profile serializes to the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonProfile {
    /// Full name
    #[serde(default)]
    pub name: String,

    /// Job title or field
    #[serde(default)]
    pub profession: String,

    /// Employer, school or organization
    #[serde(default)]
    pub workplace: String,

    /// Public email address
    #[serde(default)]
    pub email: String,

    /// Public phone number
    #[serde(default)]
    pub phone: String,

    /// Three to five short facts taken from the sources
    #[serde(default)]
    pub fun_facts: Vec<String>,
}

impl PersonProfile {
    /// Whether the profile names anyone at all
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let profile: PersonProfile = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert!(profile.email.is_empty());
        assert!(profile.fun_facts.is_empty());
        assert!(profile.is_named());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let profile: PersonProfile =
            serde_json::from_str(r#"{"name": "Jane", "age": 41}"#).unwrap();
        assert_eq!(profile.name, "Jane");
    }
}
