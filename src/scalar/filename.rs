//! Upload filename normalization.

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`, collapses
/// runs of `.` into one, and caps the length.
///
/// Collapsing dots turns `..` into `.`, so the result can never name a
/// parent directory, while `name.ext` survives.
///
/// # Example
///
/// ```
/// use input_guard::FilenameSanitizer;
///
/// let names = FilenameSanitizer::new(255);
/// assert_eq!(names.sanitize("../../etc/passwd").as_deref(), Some("._._etc_passwd"));
/// assert_eq!(names.sanitize("   "), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FilenameSanitizer {
    max_length: usize,
}

impl FilenameSanitizer {
    /// Create a sanitizer capping names at `max_length` characters.
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Normalize `input`. Returns `None` if nothing is left after trimming.
    pub fn sanitize(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut out = String::with_capacity(trimmed.len().min(self.max_length));
        for c in trimmed.chars() {
            if out.len() >= self.max_length {
                break;
            }
            let c = if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            };
            if c == '.' && out.ends_with('.') {
                continue;
            }
            out.push(c);
        }

        Some(out)
    }
}
