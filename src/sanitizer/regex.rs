//! Regex-based denylist sanitizer.

use regex::Regex;

use super::Sanitizer;
use crate::error::Result;

/// Characters a browser silently drops inside a URL scheme.
const SCHEME_NOISE: &str = r"[\t\n\r]*";

/// Sanitizer that applies a series of regex find-and-replace rules.
///
/// Rules are applied in order; each rule operates on the output of the
/// previous one. The `regex` crate matches in linear time, so adversarial
/// input cannot trigger catastrophic backtracking.
///
/// # Example
///
/// ```
/// use input_guard::{RegexSanitizer, Sanitizer};
///
/// let sanitizer = RegexSanitizer::event_handlers();
/// let result = sanitizer.sanitize(r#"<b onclick="steal()">hi</b>"#);
/// assert_eq!(result, "<b >hi</b>");
/// ```
pub struct RegexSanitizer {
    rules: Vec<(Regex, String)>,
}

impl RegexSanitizer {
    /// Create a new `RegexSanitizer` from a list of `(pattern, replacement)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if any regex pattern is invalid. Use [`try_new`](Self::try_new)
    /// for a fallible alternative.
    pub fn new(rules: Vec<(&str, &str)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("invalid regex pattern"),
                    replacement.to_string(),
                )
            })
            .collect();
        Self { rules }
    }

    /// Fallible constructor that returns an error for invalid patterns.
    pub fn try_new(rules: Vec<(&str, &str)>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, replacement.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Remove complete `<tag ...>...</tag>` blocks, content included, for
    /// every given element name. Matching is case-insensitive, spans
    /// newlines, and tolerates arbitrary attributes on both tags.
    pub fn element_blocks<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let patterns: Vec<String> = tags
            .iter()
            .map(|tag| {
                let tag = regex::escape(tag.as_ref());
                format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\b[^>]*>")
            })
            .collect();
        Self::try_new(patterns.iter().map(|p| (p.as_str(), "")).collect())
    }

    /// Remove `on<name>=value` event-handler assignments, name and value,
    /// where the value is double-quoted, single-quoted, bare, or missing.
    pub fn event_handlers() -> Self {
        Self::new(vec![(
            r#"(?i)on\w+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#,
            "",
        )])
    }

    /// Remove `<scheme>:` tokens for every given scheme, tolerating tab,
    /// CR and LF between the characters.
    pub fn schemes<S: AsRef<str>>(schemes: &[S]) -> Result<Self> {
        let patterns: Vec<String> = schemes
            .iter()
            .map(|scheme| {
                let body = scheme
                    .as_ref()
                    .chars()
                    .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
                    .collect::<Vec<_>>()
                    .join(SCHEME_NOISE);
                format!("(?i){body}{SCHEME_NOISE}:")
            })
            .collect();
        Self::try_new(patterns.iter().map(|p| (p.as_str(), "")).collect())
    }
}

impl Sanitizer for RegexSanitizer {
    fn sanitize(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_script_blocks_across_lines() {
        let sanitizer = RegexSanitizer::element_blocks(&["script"]).unwrap();
        let input = "before<SCRIPT type=\"text/javascript\">\nalert(1);\n</Script >after";
        assert_eq!(sanitizer.sanitize(input), "beforeafter");
    }

    #[test]
    fn script_blocks_are_non_greedy() {
        let sanitizer = RegexSanitizer::element_blocks(&["script"]).unwrap();
        let input = "<script>a()</script>keep<script>b()</script>";
        assert_eq!(sanitizer.sanitize(input), "keep");
    }

    #[test]
    fn element_blocks_require_exact_tag_name() {
        let sanitizer = RegexSanitizer::element_blocks(&["object"]).unwrap();
        let input = "<objection>fine</objection><object data=x>gone</object>";
        assert_eq!(sanitizer.sanitize(input), "<objection>fine</objection>");
    }

    #[test]
    fn unclosed_block_is_left_alone() {
        let sanitizer = RegexSanitizer::element_blocks(&["iframe"]).unwrap();
        assert_eq!(sanitizer.sanitize("<iframe src=x>"), "<iframe src=x>");
    }

    #[test]
    fn remove_event_handlers_of_every_quote_style() {
        let sanitizer = RegexSanitizer::event_handlers();
        assert_eq!(sanitizer.sanitize(r#"<a onclick="x()">"#), "<a >");
        assert_eq!(sanitizer.sanitize("<a onMouseOver = 'x()'>"), "<a >");
        assert_eq!(sanitizer.sanitize("<img src=x onerror=alert(1)>"), "<img src=x >");
        assert_eq!(sanitizer.sanitize("<a onfocus=>"), "<a >");
    }

    #[test]
    fn mismatched_quote_handler_is_removed_as_bare_value() {
        let sanitizer = RegexSanitizer::event_handlers();
        let result = sanitizer.sanitize(r#"<a onclick="alert(1)>x"#);
        assert!(!result.contains("onclick"));
        assert!(!result.contains("alert"));
    }

    #[test]
    fn remove_schemes_with_injected_whitespace() {
        let sanitizer = RegexSanitizer::schemes(&["javascript"]).unwrap();
        assert_eq!(sanitizer.sanitize("javascript:alert(1)"), "alert(1)");
        assert_eq!(sanitizer.sanitize("JaVaScRiPt:x"), "x");
        assert_eq!(sanitizer.sanitize("java\tscr\nipt\r:x"), "x");
        assert_eq!(sanitizer.sanitize("javascript is fun"), "javascript is fun");
    }

    #[test]
    fn every_denied_scheme_is_removed() {
        let sanitizer = RegexSanitizer::schemes(&["javascript", "vbscript"]).unwrap();
        assert_eq!(sanitizer.sanitize("VBScript:msgbox"), "msgbox");
        assert_eq!(sanitizer.sanitize("https://example.com"), "https://example.com");
    }

    #[test]
    fn no_rules_returns_original() {
        let sanitizer = RegexSanitizer::new(vec![]);
        assert_eq!(sanitizer.sanitize("<p>unchanged</p>"), "<p>unchanged</p>");
    }

    #[test]
    fn try_new_invalid_pattern() {
        let result = RegexSanitizer::try_new(vec![("[invalid", "x")]);
        assert!(result.is_err());
    }

    #[test]
    fn try_new_valid_pattern() {
        let sanitizer = RegexSanitizer::try_new(vec![(r"\d+", "NUM")]).unwrap();
        assert_eq!(sanitizer.sanitize("abc 123 def"), "abc NUM def");
    }
}
