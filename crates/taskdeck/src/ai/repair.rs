//! Response normalization and repair.
//!
//! Generated text is unreliable: models wrap JSON in markdown fences, prepend
//! prose, or ignore formatting instructions entirely. This module extracts
//! the expected structured shape through tiered strategies, each attempted
//! only if the previous one fails. The heuristic tiers are lossy and
//! order-dependent; they are a fallback, never the primary path.

use regex::Regex;
use serde_json::Value;

use crate::errors::{TrackerError, TrackerResult};

/// Expected output shape of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// Free-form prose
    FreeText,
    /// A JSON array of short strings
    StringList,
    /// A single JSON object
    Object,
}

/// Structured content recovered from raw generated text.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Text(String),
    List(Vec<String>),
    Object(Value),
}

impl StructuredValue {
    /// Consume as a string list, if that is what was recovered.
    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consume as a JSON object, if that is what was recovered.
    pub fn into_object(self) -> Option<Value> {
        match self {
            Self::Object(value) => Some(value),
            _ => None,
        }
    }

    /// Consume as text, if that is what was recovered.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Fragments shorter than this are discarded by the line-split repair tier
const MIN_FRAGMENT_LEN: usize = 3;

/// Extract the expected structured shape from raw generated text.
///
/// For `StringList` this never surfaces a parse error: it returns best-effort
/// content, or `RepairFailure` as the explicit failure signal when nothing
/// usable survives. For `Object` there is no safe generic repair, so absence
/// of extractable JSON is a `RepairFailure`.
pub fn normalize_structured(
    raw: &str,
    shape: OutputShape,
    max_items: usize,
) -> TrackerResult<StructuredValue> {
    // Tier 1: strip markdown code fences and surrounding whitespace.
    let stripped = strip_code_fences(raw).trim();

    match shape {
        OutputShape::FreeText => {
            if stripped.is_empty() {
                Err(TrackerError::RepairFailure {
                    reason: "empty text response".to_string(),
                })
            } else {
                Ok(StructuredValue::Text(stripped.to_string()))
            }
        }
        OutputShape::Object => match extract_first_json(stripped) {
            Some(Value::Object(map)) => Ok(StructuredValue::Object(Value::Object(map))),
            _ => Err(TrackerError::RepairFailure {
                reason: "no parseable JSON object in response".to_string(),
            }),
        },
        OutputShape::StringList => {
            // Tier 2: balanced JSON extraction.
            let mut items = match extract_first_json(stripped) {
                Some(Value::Array(values)) => coerce_string_items(values),
                // A wrapper object like {"steps": [...]} is close enough:
                // take its first array-of-strings value.
                Some(Value::Object(map)) => map
                    .into_iter()
                    .map(|(_, v)| v)
                    .find_map(|v| match v {
                        Value::Array(values) => {
                            let items = coerce_string_items(values);
                            if items.is_empty() {
                                None
                            } else {
                                Some(items)
                            }
                        }
                        _ => None,
                    })
                    .unwrap_or_default(),
                _ => Vec::new(),
            };

            // Tier 3: split the raw text into list items.
            if items.is_empty() {
                tracing::debug!("falling back to line-split repair");
                items = repair_list_from_text(stripped);
            }

            // Tier 4: cap to the expected maximum size.
            items.truncate(max_items);

            if items.is_empty() {
                Err(TrackerError::RepairFailure {
                    reason: "no usable list items in response".to_string(),
                })
            } else {
                Ok(StructuredValue::List(items))
            }
        }
    }
}

/// Strip markdown code-fence markers, both the language-tagged and bare
/// forms.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag ("json", "text", ...) up to the first
    // newline.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Extract and parse the first balanced top-level JSON object or array,
/// ignoring any prose before or after it.
fn extract_first_json(text: &str) -> Option<Value> {
    let start = text.find(['{', '['])?;
    let bytes = text.as_bytes();
    let open = bytes[start] as char;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let fragment = &text[start..=start + offset];
                    return serde_json::from_str(fragment).ok();
                }
            }
            _ => {}
        }
    }
    None
}

/// Keep string items as-is; render other scalars; drop nested composites.
fn coerce_string_items(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Last-resort list repair: split on newlines and commas, strip leading
/// numbering and bullet markers, discard stray fragments.
fn repair_list_from_text(raw: &str) -> Vec<String> {
    let marker = Regex::new(r"^\s*(?:\d+\s*[.)]\s*|[-*•]+\s*)+").unwrap();
    raw.split(['\n', ','])
        .map(|fragment| {
            let fragment = marker.replace(fragment.trim(), "");
            fragment
                .trim_matches(|c: char| "[]{}\"'`".contains(c))
                .trim()
                .to_string()
        })
        .filter(|s| s.len() >= MIN_FRAGMENT_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_array() {
        let value =
            normalize_structured("```json\n[\"a\",\"b\"]\n```", OutputShape::StringList, 5)
                .unwrap();
        assert_eq!(value, StructuredValue::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_bare_fence() {
        let value = normalize_structured("```\n[\"x\"]\n```", OutputShape::StringList, 5).unwrap();
        assert_eq!(value, StructuredValue::List(vec!["x".into()]));
    }

    #[test]
    fn test_prose_wrapped_array() {
        let raw = "Sure! Here are the steps:\n[\"Draft outline\", \"Review\"]\nHope that helps.";
        let value = normalize_structured(raw, OutputShape::StringList, 5).unwrap();
        assert_eq!(
            value,
            StructuredValue::List(vec!["Draft outline".into(), "Review".into()])
        );
    }

    #[test]
    fn test_numbered_lines_repair() {
        let value =
            normalize_structured("1. Do X\n2. Do Y", OutputShape::StringList, 5).unwrap();
        assert_eq!(
            value,
            StructuredValue::List(vec!["Do X".into(), "Do Y".into()])
        );
    }

    #[test]
    fn test_bulleted_lines_repair() {
        let value = normalize_structured(
            "- First step\n* Second step\n• Third step",
            OutputShape::StringList,
            5,
        )
        .unwrap();
        assert_eq!(
            value,
            StructuredValue::List(vec![
                "First step".into(),
                "Second step".into(),
                "Third step".into()
            ])
        );
    }

    #[test]
    fn test_wrapper_object_with_array() {
        let raw = r#"{"steps": ["Research", "Draft", "Submit"]}"#;
        let value = normalize_structured(raw, OutputShape::StringList, 5).unwrap();
        assert_eq!(
            value,
            StructuredValue::List(vec!["Research".into(), "Draft".into(), "Submit".into()])
        );
    }

    #[test]
    fn test_list_cap() {
        let raw = r#"["a1","b2","c3","d4","e5","f6","g7"]"#;
        let value = normalize_structured(raw, OutputShape::StringList, 3).unwrap();
        assert_eq!(value.into_list().unwrap().len(), 3);
    }

    #[test]
    fn test_list_never_panics_on_garbage() {
        // Unbalanced brackets, stray punctuation, nothing usable.
        let result = normalize_structured("[[[ ,, ]\"", OutputShape::StringList, 5);
        assert!(matches!(
            result,
            Err(TrackerError::RepairFailure { .. })
        ));
    }

    #[test]
    fn test_object_happy_path() {
        let raw = "```json\n{\"energyLevel\": \"Deep Work\"}\n```";
        let value = normalize_structured(raw, OutputShape::Object, 5).unwrap();
        let object = value.into_object().unwrap();
        assert_eq!(object["energyLevel"], "Deep Work");
    }

    #[test]
    fn test_object_from_prose() {
        let raw = "Here you go: {\"suggestedPriority\": \"High\"} - let me know!";
        let value = normalize_structured(raw, OutputShape::Object, 5).unwrap();
        assert_eq!(value.into_object().unwrap()["suggestedPriority"], "High");
    }

    #[test]
    fn test_object_with_nested_braces_in_strings() {
        let raw = r#"{"note": "use {braces} and \"quotes\"", "ok": true}"#;
        let value = normalize_structured(raw, OutputShape::Object, 5).unwrap();
        assert_eq!(value.into_object().unwrap()["ok"], true);
    }

    #[test]
    fn test_object_repair_failure() {
        let result = normalize_structured("no json here at all", OutputShape::Object, 5);
        assert!(matches!(result, Err(TrackerError::RepairFailure { .. })));
    }

    #[test]
    fn test_object_shape_rejects_array() {
        let result = normalize_structured("[1, 2, 3]", OutputShape::Object, 5);
        assert!(matches!(result, Err(TrackerError::RepairFailure { .. })));
    }

    #[test]
    fn test_free_text_passthrough() {
        let value =
            normalize_structured("  You've got this!  ", OutputShape::FreeText, 5).unwrap();
        assert_eq!(value, StructuredValue::Text("You've got this!".into()));
    }

    #[test]
    fn test_free_text_empty_fails() {
        let result = normalize_structured("   ", OutputShape::FreeText, 5);
        assert!(matches!(result, Err(TrackerError::RepairFailure { .. })));
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }
}
