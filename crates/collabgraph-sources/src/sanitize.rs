//! Tolerant decoding of generative payloads. Models wrap JSON in markdown
//! fences or chat filler; we strip the fences and locate the outermost
//! `{...}` span before handing anything to serde.

/// Removes a leading/trailing markdown code fence, including an optional
/// language tag on the opening fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Skip the language tag line ("```json\n").
        s = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Extracts the outermost JSON object span from free text, or `None` when
/// the text holds no braces at all.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let stripped = strip_code_fences(text);
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&stripped[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_bare_json_through() {
        assert_eq!(extract_json_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn strips_fences_with_language_tag() {
        let text = "```json\n{\"collaborators\":[]}\n```";
        assert_eq!(extract_json_object(text), Some("{\"collaborators\":[]}"));
    }

    #[test]
    fn finds_object_inside_chat_filler() {
        let text = "Sure! Here is the data you asked for:\n{\"a\": {\"b\": 2}}\nHope that helps.";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn no_braces_yields_none() {
        assert_eq!(extract_json_object("I could not find any collaborators."), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn reversed_braces_yield_none() {
        assert_eq!(extract_json_object("} nothing {"), None);
    }
}
