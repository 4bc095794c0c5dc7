//! Parse and validate LLM output into an actor draft

use crate::error::ExtractionError;
use castlist_domain::{ActorDraft, Gender};
use serde_json::{Map, Value};
use tracing::warn;

/// Parse raw LLM output into a validated actor draft
///
/// The raw text must be a bare JSON object; prose, markdown fencing, or
/// any other shape fails with [`ExtractionError::InvalidModelResponse`].
/// The description on the returned draft is always the original input,
/// the model is never trusted to echo it back.
///
/// Mandatory fields are checked in a fixed order, short-circuiting at
/// the first violation: first name, then last name, then address.
/// Optional fields coerce leniently: values that are not what the
/// prompt asked for become null instead of failing the submission.
pub fn parse_actor_response(
    raw: &str,
    description: &str,
) -> Result<ActorDraft, ExtractionError> {
    let json: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        warn!("Model output is not valid JSON: {}", e);
        ExtractionError::InvalidModelResponse
    })?;

    let obj = json
        .as_object()
        .ok_or(ExtractionError::InvalidModelResponse)?;

    let first_name = string_field(obj, "first_name").ok_or(ExtractionError::FirstNameMissing)?;
    let last_name = string_field(obj, "last_name").ok_or(ExtractionError::LastNameMissing)?;
    let address = string_field(obj, "address").ok_or(ExtractionError::AddressMissing)?;

    Ok(ActorDraft {
        first_name,
        last_name,
        address,
        gender: obj
            .get("gender")
            .and_then(Value::as_str)
            .and_then(Gender::parse),
        height: int_field(obj, "height"),
        weight: int_field(obj, "weight"),
        age: int_field(obj, "age"),
        description: description.to_string(),
    })
}

/// Non-empty string value for a key, or None
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-negative integer value for a key, or None
///
/// Floats, negatives, numeric strings, and other junk all coerce to
/// None rather than erroring.
fn int_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_i64)
        .and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "John Doe, 25 years old, male, 180cm, 75kg, lives in New York";

    #[test]
    fn test_parse_full_response() {
        let raw = r#"{
            "first_name": "John",
            "last_name": "Doe",
            "address": "New York",
            "gender": "male",
            "height": 180,
            "weight": 75,
            "age": 25
        }"#;

        let draft = parse_actor_response(raw, DESCRIPTION).unwrap();
        assert_eq!(draft.first_name, "John");
        assert_eq!(draft.last_name, "Doe");
        assert_eq!(draft.address, "New York");
        assert_eq!(draft.gender, Some(Gender::Male));
        assert_eq!(draft.height, Some(180));
        assert_eq!(draft.weight, Some(75));
        assert_eq!(draft.age, Some(25));
        assert_eq!(draft.description, DESCRIPTION);
    }

    #[test]
    fn test_description_comes_from_input_not_model() {
        let raw = r#"{
            "first_name": "John",
            "last_name": "Doe",
            "address": "New York",
            "description": "model-invented text"
        }"#;

        let draft = parse_actor_response(raw, DESCRIPTION).unwrap();
        assert_eq!(draft.description, DESCRIPTION);
    }

    #[test]
    fn test_optional_fields_null() {
        let raw = r#"{
            "first_name": "Jane",
            "last_name": "Smith",
            "address": "London",
            "gender": null,
            "height": null,
            "weight": null,
            "age": null
        }"#;

        let draft = parse_actor_response(raw, "Jane Smith from London").unwrap();
        assert_eq!(draft.gender, None);
        assert_eq!(draft.height, None);
        assert_eq!(draft.weight, None);
        assert_eq!(draft.age, None);
    }

    #[test]
    fn test_missing_keys_become_null() {
        let raw = r#"{"first_name": "Jane", "last_name": "Smith", "address": "London"}"#;
        let draft = parse_actor_response(raw, "d").unwrap();
        assert_eq!(draft.gender, None);
        assert_eq!(draft.age, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = r#"{
            "first_name": "Jane",
            "last_name": "Smith",
            "address": "London",
            "eye_color": "green",
            "confidence": 0.9
        }"#;
        assert!(parse_actor_response(raw, "d").is_ok());
    }

    #[test]
    fn test_junk_optional_values_coerce_to_null() {
        let raw = r#"{
            "first_name": "Jane",
            "last_name": "Smith",
            "address": "London",
            "gender": "unknown",
            "height": "180cm",
            "weight": -5,
            "age": 25.5
        }"#;

        let draft = parse_actor_response(raw, "d").unwrap();
        assert_eq!(draft.gender, None);
        assert_eq!(draft.height, None);
        assert_eq!(draft.weight, None);
        assert_eq!(draft.age, None);
    }

    #[test]
    fn test_missing_first_name_null() {
        let raw = r#"{"first_name": null, "last_name": "Doe", "address": "NY"}"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::FirstNameMissing));
    }

    #[test]
    fn test_missing_first_name_empty_string() {
        let raw = r#"{"first_name": "", "last_name": "Doe", "address": "NY"}"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::FirstNameMissing));
    }

    #[test]
    fn test_first_name_checked_before_last_name_and_address() {
        // Everything is missing; the first check in order wins
        let raw = r#"{}"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::FirstNameMissing));
    }

    #[test]
    fn test_missing_last_name() {
        let raw = r#"{"first_name": "John", "address": "NY"}"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::LastNameMissing));
    }

    #[test]
    fn test_missing_address() {
        let raw = r#"{"first_name": "John", "last_name": "Doe", "address": ""}"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::AddressMissing));
    }

    #[test]
    fn test_prose_response_is_invalid() {
        let result = parse_actor_response("I could not extract any data.", "d");
        assert_eq!(result, Err(ExtractionError::InvalidModelResponse));
    }

    #[test]
    fn test_markdown_fenced_response_is_invalid() {
        let raw = "```json\n{\"first_name\": \"John\"}\n```";
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::InvalidModelResponse));
    }

    #[test]
    fn test_json_array_is_invalid() {
        let raw = r#"[{"first_name": "John"}]"#;
        let result = parse_actor_response(raw, "d");
        assert_eq!(result, Err(ExtractionError::InvalidModelResponse));
    }

    #[test]
    fn test_json_scalar_is_invalid() {
        let result = parse_actor_response("42", "d");
        assert_eq!(result, Err(ExtractionError::InvalidModelResponse));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let raw = "\n  {\"first_name\": \"John\", \"last_name\": \"Doe\", \"address\": \"NY\"}  \n";
        assert!(parse_actor_response(raw, "d").is_ok());
    }
}
