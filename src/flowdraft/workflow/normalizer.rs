//! Response normalization - strips markdown code fences from model replies
//!
//! Handles:
//! - Fenced payloads: ```json\n{...}\n```
//! - Fences without a language tag, or with another tag (```yaml)
//! - Info strings after the backticks (``` json title="w") and longer fences (````)
//! - A reply cut off before its closing fence
//! - Plain JSON with surrounding whitespace

const FENCE: &str = "```";

/// Strip a leading fence opening (with optional language tag) and a trailing
/// fence, trimming whitespace. Text without fences is only trimmed.
///
/// Stripping repeats until neither edge carries a fence, so the function is
/// idempotent.
pub fn normalize(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let next = strip_fences(current);
        if next.len() == current.len() {
            return current.to_string();
        }
        current = next;
    }
}

fn strip_fences(text: &str) -> &str {
    let mut text = text;

    if let Some(rest) = after_opening_fence(text) {
        text = match rest.split_once('\n') {
            // The opening line is an info string unless the payload starts on it
            Some((info, body)) if !starts_payload(skip_tag(info)) => body,
            _ => skip_tag(rest),
        };
    }

    text = before_closing_fence(text).unwrap_or(text);
    text.trim()
}

/// Text after a leading run of three or more backticks
fn after_opening_fence(text: &str) -> Option<&str> {
    let rest = text.trim_start_matches('`');
    (text.len() - rest.len() >= FENCE.len()).then_some(rest)
}

/// Text before a trailing run of three or more backticks
fn before_closing_fence(text: &str) -> Option<&str> {
    let rest = text.trim_end_matches('`');
    (text.len() - rest.len() >= FENCE.len()).then_some(rest)
}

fn starts_payload(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('{' | '['))
}

/// Drop a language tag in front of a payload on the fence line
fn skip_tag(rest: &str) -> &str {
    let rest = rest.trim_start();
    let tag_len = rest
        .find(|c: char| !is_tag_char(c))
        .unwrap_or(rest.len());
    &rest[tag_len..]
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fence() {
        assert_eq!(normalize("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_plain_fence() {
        assert_eq!(normalize("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_other_language_tag() {
        assert_eq!(normalize("```yaml\nnodes: []\n```"), "nodes: []");
    }

    #[test]
    fn test_unfenced_passthrough() {
        assert_eq!(normalize("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(normalize("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(normalize("\n\n  ```json {\"a\":1} ```  \n"), "{\"a\":1}");
    }

    #[test]
    fn test_missing_closing_fence() {
        assert_eq!(normalize("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_inner_content_untouched() {
        let inner = "{\n  \"label\": \"a ``` b\"\n}";
        assert_eq!(normalize(&format!("```json\n{}\n```", inner)), inner);
    }

    #[test]
    fn test_tag_glued_to_payload() {
        assert_eq!(normalize("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_spaced_language_tag() {
        assert_eq!(normalize("``` json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_info_string_after_tag() {
        assert_eq!(
            normalize("```json title=\"w\"\n{\"a\":1}\n```"),
            "{\"a\":1}"
        );
    }

    #[test]
    fn test_four_backtick_fence() {
        assert_eq!(normalize("````json\n{\"a\":1}\n````"), "{\"a\":1}");
    }

    #[test]
    fn test_payload_on_opening_line_is_kept() {
        assert_eq!(normalize("```{\n\"a\":1}\n```"), "{\n\"a\":1}");
        assert_eq!(normalize("```json [1,\n2]```"), "[1,\n2]");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("```"), "");
        assert_eq!(normalize("``````"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_idempotent() {
        for x in [
            "```json\n{\"a\":1}\n```",
            "```json\n```json\n{}\n```\n```",
            "{\"a\":1}",
            "``` ```json x ``` ```",
            "````json\n````json\n[]\n````\n````",
            "``` json title=\"w\"\n{}\n```",
            "text with ``` inside",
            "",
            "```",
        ] {
            let once = normalize(x);
            assert_eq!(normalize(&once), once, "input: {:?}", x);
        }
    }
}
