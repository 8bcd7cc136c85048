//! Structural e-mail address check and normalization.

use regex::Regex;

use crate::error::Result;

/// Exactly one `@`, a non-empty local part, and a dotted domain whose labels
/// are all non-empty.
const EMAIL: &str = r"^[^\s@]+@[^\s@.]+(?:\.[^\s@.]+)+$";

/// Lowercases and trims an address, then checks its structure.
///
/// This is a shape check, not RFC 5322 validation: quoted local parts,
/// comments and IP-literal domains are not supported.
///
/// # Example
///
/// ```
/// use input_guard::EmailSanitizer;
///
/// let emails = EmailSanitizer::new(254).unwrap();
/// assert_eq!(emails.sanitize(" TEST@EXAMPLE.COM ").as_deref(), Some("test@example.com"));
/// assert_eq!(emails.sanitize("user@.com"), None);
/// ```
#[derive(Debug, Clone)]
pub struct EmailSanitizer {
    pattern: Regex,
    max_length: usize,
}

impl EmailSanitizer {
    /// Create a sanitizer rejecting normalized addresses longer than
    /// `max_length` characters.
    pub fn new(max_length: usize) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(EMAIL)?,
            max_length,
        })
    }

    /// Normalize and check `input`.
    pub fn sanitize(&self, input: &str) -> Option<String> {
        let normalized = input.trim().to_lowercase();

        if normalized.chars().count() > self.max_length {
            tracing::debug!(len = normalized.len(), "Rejected over-long email address");
            return None;
        }
        if !self.pattern.is_match(&normalized) {
            tracing::debug!(len = normalized.len(), "Rejected malformed email address");
            return None;
        }

        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails() -> EmailSanitizer {
        EmailSanitizer::new(254).unwrap()
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let e = emails();
        assert_eq!(e.sanitize("TEST@EXAMPLE.COM").as_deref(), Some("test@example.com"));
        assert_eq!(
            e.sanitize("\t First.Last+tag@Mail.Example.co.uk \n").as_deref(),
            Some("first.last+tag@mail.example.co.uk")
        );
    }

    #[test]
    fn rejects_structurally_invalid_addresses() {
        let e = emails();
        for bad in [
            "not-an-email",
            "@example.com",
            "user@",
            "user@.com",
            "user@example",
            "user@example.",
            "user@example..com",
            "a@b@example.com",
            "user name@example.com",
            "",
            "   ",
        ] {
            assert_eq!(e.sanitize(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn enforces_length_cap() {
        let e = EmailSanitizer::new(20).unwrap();
        assert!(e.sanitize("short@example.com").is_some());
        assert_eq!(e.sanitize("much-too-long@example.com"), None);
    }

    #[test]
    fn unicode_is_lowercased() {
        let e = emails();
        assert_eq!(e.sanitize("ÜSER@Exämple.de").as_deref(), Some("üser@exämple.de"));
    }
}
