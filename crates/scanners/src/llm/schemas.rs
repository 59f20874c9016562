//! Response contract for natural-language rules.
//!
//! The provider is untrusted: parsing never fails. Shapes that do not match
//! produce no violations, and individual malformed entries are skipped.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedViolation {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub text_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_index: Option<usize>,
}

impl ReportedViolation {
    /// Message and text match, when both are present and non-empty.
    pub fn usable(&self) -> Option<(&str, &str)> {
        let message = self.message.as_deref().filter(|m| !m.trim().is_empty())?;
        let text_match = self.text_match.as_deref().filter(|t| !t.is_empty())?;
        Some((message, text_match))
    }
}

pub fn parse_violations(response: &Value) -> Vec<ReportedViolation> {
    if let Value::String(text) = response {
        return match serde_json::from_str::<Value>(&extract_json_from_text(text)) {
            Ok(value @ Value::Object(_)) => parse_violations(&value),
            _ => {
                debug!("Analysis response text is not a JSON object");
                Vec::new()
            }
        };
    }

    let Some(object) = response.as_object() else {
        debug!("Analysis response is not an object");
        return Vec::new();
    };
    let Some(entries) = object.get("issues").and_then(Value::as_array) else {
        debug!("Analysis response has no issue list");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match ReportedViolation::deserialize(entry) {
            Ok(violation) => Some(violation),
            Err(e) => {
                debug!("Skipping malformed violation entry: {}", e);
                None
            }
        })
        .collect()
}

/// Schema advertised to providers that support structured output.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "textMatch": { "type": "string" },
                        "suggestion": { "type": "string" },
                        "occurrenceIndex": { "type": "integer", "minimum": 0 }
                    },
                    "required": ["message", "textMatch"]
                }
            }
        },
        "required": ["issues"]
    })
}

/// Pull a JSON object out of free-form model output, preferring a fenced
/// ```json block, then the first balanced `{...}`. Falls back to the input.
pub fn extract_json_from_text(text: &str) -> String {
    if let Some(start) = text.find("```json") {
        let body = &text[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim().to_string();
        }
    }

    if let Some(start) = text.find('{') {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, byte) in text.as_bytes()[start..].iter().enumerate() {
            if escape_next {
                escape_next = false;
                continue;
            }
            match byte {
                b'\\' if in_string => escape_next = true,
                b'"' => in_string = !in_string,
                b'{' if !in_string => depth += 1,
                b'}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return text[start..start + i + 1].to_string();
                    }
                }
                _ => {}
            }
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_shapes_yield_nothing() {
        assert!(parse_violations(&json!(null)).is_empty());
        assert!(parse_violations(&json!([1, 2])).is_empty());
        assert!(parse_violations(&json!({ "issues": "nope" })).is_empty());
        assert!(parse_violations(&json!({ "other": [] })).is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let violations = parse_violations(&json!({
            "issues": [
                { "message": "Passive voice", "textMatch": "was written", "occurrenceIndex": 1 },
                { "message": "Bad index", "textMatch": "x", "occurrenceIndex": "first" },
                "not an object",
                { "message": "No match" }
            ]
        }));

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].occurrence_index, Some(1));
        assert!(violations[0].usable().is_some());
        assert!(violations[1].usable().is_none());
    }

    #[test]
    fn test_text_responses_are_unwrapped() {
        let text = "Sure!\n```json\n{\"issues\": [{\"message\": \"m\", \"textMatch\": \"t\"}]}\n```";
        let violations = parse_violations(&Value::String(text.to_string()));
        assert_eq!(violations.len(), 1);

        assert_eq!(extract_json_from_text("noise {\"a\": \"}\"} tail"), "{\"a\": \"}\"}");
    }
}
