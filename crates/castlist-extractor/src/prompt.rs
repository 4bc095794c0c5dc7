//! LLM prompt engineering for actor data extraction

/// Build the extraction prompt for a description
///
/// Pure and deterministic: the same description always yields the same
/// prompt, with the description interpolated verbatim at the end.
pub fn build_extraction_prompt(description: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(EXTRACTION_INSTRUCTIONS);
    prompt.push_str("\n\nDescription:\n");
    prompt.push_str(description);

    prompt
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are an information extractor. Understand any language (English/Ukrainian, etc.).
Return ONLY a single valid JSON object with these keys:
first_name, last_name, address, height, weight, gender, age.

Type rules:
- first_name, last_name, address: non-empty strings when present, otherwise null.
- height, weight, age: integers or null (no units, only numbers).
- gender: one of "male", "female", "other", or null.
- Do not invent information. If a value is not specified in the description, return null.

No extra text, no explanations, no markdown. ONLY JSON."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_description_verbatim() {
        let description = "Олександр Коваль, 30 років, живе у Києві";
        let prompt = build_extraction_prompt(description);
        assert!(prompt.contains(description));
        // Description comes last
        assert!(prompt.ends_with(description));
    }

    #[test]
    fn test_prompt_contains_required_keys() {
        let prompt = build_extraction_prompt("test");
        assert!(prompt.contains("first_name, last_name, address, height, weight, gender, age"));
    }

    #[test]
    fn test_prompt_contains_type_rules() {
        let prompt = build_extraction_prompt("test");
        assert!(prompt.contains("integers or null"));
        assert!(prompt.contains(r#"one of "male", "female", "other", or null"#));
        assert!(prompt.contains("Do not invent information"));
    }

    #[test]
    fn test_prompt_demands_json_only() {
        let prompt = build_extraction_prompt("test");
        assert!(prompt.contains("ONLY a single valid JSON object"));
        assert!(prompt.contains("no markdown"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_extraction_prompt("same input");
        let b = build_extraction_prompt("same input");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_with_empty_description() {
        let prompt = build_extraction_prompt("");
        assert!(prompt.ends_with("Description:\n"));
    }
}
