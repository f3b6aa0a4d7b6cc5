//! Free-text sanitizer
//!
//! Removes literal angle brackets so stored text cannot open an HTML tag.
//! This is a narrow defense: attribute payloads such as `" onerror=` and
//! entity-encoded input (`&lt;script&gt;`) pass through unchanged. Rendering
//! must still escape output.

/// Trim, then drop every `<` and `>`.
pub fn sanitize_string(raw: &str) -> String {
    raw.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Sanitize an optional free-text value; empty results collapse to `None`.
pub fn sanitize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize_string).filter(|s| !s.is_empty())
}

/// URLs are only trimmed. Stripping characters would change their meaning.
pub fn trim_url(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize_string("<b>hi</b>"), "bhi/b");
        assert_eq!(
            sanitize_string("  <script>alert(1)</script>  "),
            "scriptalert(1)/script"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize_string("  hello world \n"), "hello world");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(sanitize_string("Tom & Jerry's \"site\""), "Tom & Jerry's \"site\"");
    }

    #[test]
    fn test_optional_collapses_empty() {
        assert_eq!(sanitize_optional(None), None);
        assert_eq!(sanitize_optional(Some("   ")), None);
        assert_eq!(sanitize_optional(Some("<>")), None);
        assert_eq!(sanitize_optional(Some(" bio ")), Some("bio".to_string()));
    }

    #[test]
    fn test_url_is_only_trimmed() {
        assert_eq!(
            trim_url("  https://a.com/?q=<x>  "),
            "https://a.com/?q=<x>"
        );
    }
}
