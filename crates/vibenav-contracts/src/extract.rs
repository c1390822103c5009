/// Narrows a free-form model response down to the JSON text worth parsing.
///
/// First match wins:
/// 1. the body of the first code fence labelled `json`
/// 2. the span from the first `{` to the last `}`
/// 3. the whole response
///
/// The result is always trimmed. Nothing here parses or fails; a bad span
/// surfaces later as a parse error with the snippet attached.
pub fn extract_json(raw: &str) -> String {
    if let Some(body) = fenced_json_block(raw) {
        return body.trim().to_string();
    }
    if let Some(span) = brace_span(raw) {
        return span.trim().to_string();
    }
    raw.trim().to_string()
}

fn fenced_json_block(text: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find("```") {
        let label_start = search_from + offset + 3;
        let label = text.get(label_start..label_start + 4);
        let label_ends = text[label_start..]
            .chars()
            .nth(4)
            .map(|next| !next.is_ascii_alphanumeric())
            .unwrap_or(true);
        if label.is_some_and(|label| label.eq_ignore_ascii_case("json")) && label_ends {
            let body_start = label_start + 4;
            let close = text[body_start..].find("```")?;
            return Some(&text[body_start..body_start + close]);
        }
        search_from = label_start;
    }
    None
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::extract_json;

    #[test]
    fn fenced_block_wins_over_loose_braces() {
        let raw = "Here is {not this} the plan:\n```json\n{\"brandName\": \"A\"}\n```\ntrailing }";
        assert_eq!(extract_json(raw), "{\"brandName\": \"A\"}");
    }

    #[test]
    fn fence_label_is_case_insensitive_and_may_share_the_line() {
        assert_eq!(extract_json("```JSON {\"a\": 1} ```"), "{\"a\": 1}");
    }

    #[test]
    fn unlabelled_fences_fall_through_to_brace_span() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw), "{\"a\": 1}");
    }

    #[test]
    fn skips_non_json_fences_before_the_json_one() {
        let raw = "```text\nignore { me }\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json(raw), "{\"b\": 2}");
    }

    #[test]
    fn jsonl_label_is_not_treated_as_json() {
        let raw = "```jsonl\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw), "{\"a\": 1}");
    }

    #[test]
    fn multi_line_object_without_fences_returns_exact_span() {
        let raw = concat!(
            "Sure! Below is the blueprint.\n\n",
            "  {\n  \"brandName\": \"Cafe\",\n  \"sections\": []\n}  \n",
            "Hope this helps."
        );
        assert_eq!(
            extract_json(raw),
            "{\n  \"brandName\": \"Cafe\",\n  \"sections\": []\n}"
        );
    }

    #[test]
    fn no_braces_returns_trimmed_text() {
        assert_eq!(
            extract_json("  I cannot help with that.  \n"),
            "I cannot help with that."
        );
        assert_eq!(extract_json("} backwards {"), "} backwards {");
    }

    #[test]
    fn unterminated_json_fence_falls_back_to_braces() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract_json(raw), "{\"a\": 1}");
    }

    #[test]
    fn multibyte_text_around_fences_is_handled() {
        let raw = "기획서입니다 ```json\n{\"brandName\": \"카페\"}\n``` 감사합니다";
        assert_eq!(extract_json(raw), "{\"brandName\": \"카페\"}");
    }
}
