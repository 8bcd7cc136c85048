//! Character-removal sanitizer.

use super::Sanitizer;

/// Sanitizer that deletes every occurrence of a fixed set of characters.
///
/// # Example
///
/// ```
/// use input_guard::{CharStripper, Sanitizer};
///
/// let s = CharStripper::new(['<', '>']);
/// assert_eq!(s.sanitize("<div>text</div>"), "divtext/div");
/// ```
pub struct CharStripper {
    chars: Vec<char>,
}

impl CharStripper {
    /// Create a new `CharStripper` removing the given characters.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }
}

impl Sanitizer for CharStripper {
    fn sanitize(&self, input: &str) -> String {
        input.chars().filter(|c| !self.chars.contains(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_listed_characters() {
        let stripper = CharStripper::new(['<', '>']);
        assert_eq!(
            stripper.sanitize(r#"<a title="x">link</a>"#),
            r#"a title="x"link/a"#
        );
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let stripper = CharStripper::new(['<', '>']);
        assert_eq!(stripper.sanitize("<p>日本語テキスト</p>"), "p日本語テキスト/p");
    }

    #[test]
    fn nothing_to_strip_returns_original() {
        let stripper = CharStripper::new(['<', '>']);
        assert_eq!(stripper.sanitize("plain text"), "plain text");
    }

    #[test]
    fn empty_set_is_a_no_op() {
        let stripper = CharStripper::new([]);
        assert_eq!(stripper.sanitize("<b>"), "<b>");
    }
}
