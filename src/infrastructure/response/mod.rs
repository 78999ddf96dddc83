use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

// Summaries are plain text; a fenced block means the model answered with code
static CODE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[\s\S]*?```").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip reasoning tags and code blocks from a model summary
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = CODE_FENCE_PATTERN.replace_all(&cleaned, "").to_string();

    let cleaned = cleaned.trim();

    // Collapse multiple consecutive newlines into at most two
    MULTIPLE_NEWLINES_PATTERN
        .replace_all(cleaned, "\n\n")
        .to_string()
}

/// True when the response is the backend's "could not answer" message
pub fn is_no_answer(response: &str, sentinel: &str) -> bool {
    let sentinel = sentinel.trim();
    !sentinel.is_empty() && response.trim_start().starts_with(sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think/>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_code_fences() {
        let input = "Monthly sales by store.\n\n```python\ndf.head()\n```\n\n\n\nCovers 2023.";
        assert_eq!(
            clean_llm_response(input),
            "Monthly sales by store.\n\nCovers 2023."
        );
    }

    #[test]
    fn test_only_artifacts_becomes_empty() {
        assert_eq!(clean_llm_response("<think>hmm</think>\n  "), "");
    }

    #[test]
    fn test_is_no_answer() {
        let sentinel = "Unfortunately, I was not able to";
        assert!(is_no_answer(
            "Unfortunately, I was not able to answer your question, because of the following error: x",
            sentinel
        ));
        assert!(!is_no_answer("The file lists invoices.", sentinel));
        assert!(!is_no_answer("anything", "  "));
    }
}
