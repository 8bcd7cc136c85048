//! Plain-text sanitizer: removes scripting constructs, de-fangs the rest of
//! the markup, and caps the length.

use super::{CharStripper, RegexSanitizer, Sanitizer, SanitizerPipeline};
use crate::error::Result;

/// Sanitizer for free-form text fields.
///
/// Runs, in order and repeated until nothing changes:
///
/// 1. removal of complete dangerous element blocks (`<script>...</script>`),
/// 2. removal of `on<name>=value` event-handler assignments,
/// 3. removal of denied scheme tokens (`javascript:`),
/// 4. stripping of the remaining `<` and `>` characters.
///
/// The passes see the whole input, so a block longer than the length cap is
/// still removed as a unit. The result is then truncated to the maximum
/// length in characters. If the passes do not settle within the pass
/// budget, the result is empty.
///
/// # Example
///
/// ```
/// use input_guard::{TextSanitizer, Sanitizer};
///
/// let sanitizer = TextSanitizer::new(&["script"], &["javascript"], 10_000, 32).unwrap();
/// assert_eq!(sanitizer.sanitize("<div>テキスト</div>"), "divテキスト/div");
/// ```
pub struct TextSanitizer {
    passes: SanitizerPipeline,
    max_length: usize,
    max_passes: usize,
}

impl TextSanitizer {
    /// Build a text sanitizer from the dangerous element names, the denied
    /// schemes, the default length cap and the pass budget.
    pub fn new<S: AsRef<str>>(
        dangerous_elements: &[S],
        denied_schemes: &[S],
        max_length: usize,
        max_passes: usize,
    ) -> Result<Self> {
        let mut passes = SanitizerPipeline::new();
        passes.add(RegexSanitizer::element_blocks(dangerous_elements)?);
        passes.add(RegexSanitizer::event_handlers());
        passes.add(RegexSanitizer::schemes(denied_schemes)?);
        passes.add(CharStripper::new(['<', '>']));

        Ok(Self {
            passes,
            max_length,
            max_passes,
        })
    }

    /// Sanitize with an explicit length cap instead of the default one.
    pub fn sanitize_with_limit(&self, input: &str, max_length: usize) -> String {
        match self.passes.sanitize_until_stable(input, self.max_passes) {
            Some(clean) => truncate_chars(&clean, max_length).to_string(),
            None => {
                tracing::warn!(
                    len = input.len(),
                    max_passes = self.max_passes,
                    "Text did not stabilise within the pass budget, discarding"
                );
                String::new()
            }
        }
    }
}

impl Sanitizer for TextSanitizer {
    fn sanitize(&self, input: &str) -> String {
        self.sanitize_with_limit(input, self.max_length)
    }
}

/// Longest prefix of `input` holding at most `max_chars` characters.
pub(crate) fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((end, _)) => &input[..end],
        None => input,
    }
}
