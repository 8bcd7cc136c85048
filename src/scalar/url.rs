//! Absolute-URL validation with a scheme allowlist.

use url::Url;

/// Accepts absolute URLs whose scheme is on the allowlist and returns them
/// in normalized form.
///
/// Normalization follows the WHATWG URL rules implemented by the `url`
/// crate: the scheme and host are lowercased and an empty path becomes `/`.
///
/// # Example
///
/// ```
/// use input_guard::UrlSanitizer;
///
/// let urls = UrlSanitizer::new(&["http", "https"]);
/// assert_eq!(urls.sanitize("HTTPS://Example.com").as_deref(), Some("https://example.com/"));
/// assert_eq!(urls.sanitize("javascript:alert(1)"), None);
/// ```
#[derive(Debug, Clone)]
pub struct UrlSanitizer {
    allowed_schemes: Vec<String>,
}

impl UrlSanitizer {
    /// Create a sanitizer accepting the given schemes (compared lowercase).
    pub fn new<S: AsRef<str>>(allowed_schemes: &[S]) -> Self {
        Self {
            allowed_schemes: allowed_schemes
                .iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Parse and check `input`, returning the normalized URL.
    pub fn sanitize(&self, input: &str) -> Option<String> {
        let url = match Url::parse(input) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, len = input.len(), "Rejected malformed URL");
                return None;
            }
        };

        if !self.allowed_schemes.iter().any(|s| s == url.scheme()) {
            tracing::debug!(scheme = url.scheme(), "Rejected URL scheme");
            return None;
        }

        Some(url.into())
    }
}
