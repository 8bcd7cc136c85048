//! String sanitizers and the pass pipeline that composes them.
//!
//! Sanitizers implement the [`Sanitizer`] trait and are composed into a
//! [`SanitizerPipeline`] that runs them sequentially.
//!
//! Built-in sanitizers:
//!
//! - [`RegexSanitizer`] -- case-insensitive removal of denylisted constructs.
//! - [`CharStripper`] -- removal of individual characters.
//! - [`TextSanitizer`] -- plain-text de-fanging with a length cap.
//! - [`HtmlSanitizer`] -- allowlist re-rendering of rich content.

mod html;
mod regex;
mod strip;
mod text;

pub use self::regex::RegexSanitizer;
pub use html::HtmlSanitizer;
pub use strip::CharStripper;
pub use text::TextSanitizer;

/// Trait for string sanitizers.
///
/// Each sanitizer receives a string and returns a transformed version.
/// Implementations must be `Send + Sync` so a single engine can serve any
/// number of request threads.
pub trait Sanitizer: Send + Sync {
    /// Transform the given input, returning the sanitized result.
    fn sanitize(&self, input: &str) -> String;
}

/// An ordered chain of [`Sanitizer`] implementations applied sequentially.
///
/// Each sanitizer receives the output of the previous one. An empty pipeline
/// is a no-op.
pub struct SanitizerPipeline {
    sanitizers: Vec<Box<dyn Sanitizer>>,
}

impl SanitizerPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            sanitizers: Vec::new(),
        }
    }

    /// Append a sanitizer to the end of the pipeline.
    pub fn add(&mut self, sanitizer: impl Sanitizer + 'static) {
        self.sanitizers.push(Box::new(sanitizer));
    }

    /// Run the full pipeline once on the given input.
    pub fn sanitize(&self, input: &str) -> String {
        self.sanitizers
            .iter()
            .fold(input.to_string(), |acc, s| s.sanitize(&acc))
    }

    /// Re-run the pipeline until a pass leaves the input unchanged.
    ///
    /// Removal passes can splice surrounding text into a new match
    /// (`javajavascript:script:`), so a single pass is not enough for a
    /// denylist guarantee. Returns `None` if the input is still changing
    /// after `max_passes` passes.
    pub fn sanitize_until_stable(&self, input: &str, max_passes: usize) -> Option<String> {
        let mut current = input.to_string();
        for _ in 0..max_passes {
            let next = self.sanitize(&current);
            if next == current {
                return Some(current);
            }
            current = next;
        }
        None
    }

    /// Returns `true` if no sanitizers have been added.
    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    /// Number of sanitizers in the pipeline.
    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }
}

impl Default for SanitizerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer for SanitizerPipeline {
    fn sanitize(&self, input: &str) -> String {
        SanitizerPipeline::sanitize(self, input)
    }
}
