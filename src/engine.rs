//! The [`Engine`]: one compiled policy, one method per input domain.

use serde_json::Value;

use crate::config::{PolicyBuilder, SanitizationPolicy};
use crate::error::Result;
use crate::input::Untrusted;
use crate::query::{QueryReport, QuerySanitizer};
use crate::sanitizer::{HtmlSanitizer, Sanitizer, TextSanitizer};
use crate::scalar::{EmailSanitizer, FilenameSanitizer, UrlSanitizer, clamp_finite};

/// Sanitization engine compiled from a [`SanitizationPolicy`].
///
/// Every method is total: it returns a safe value for any input and never
/// panics. Methods take `&self` and the engine holds no mutable state, so a
/// single instance can be shared by any number of threads.
///
/// # Example
///
/// ```
/// use input_guard::Engine;
/// use serde_json::json;
///
/// let engine = Engine::default();
///
/// assert_eq!(engine.text("<b>hi</b>"), "bhi/b");
/// assert_eq!(engine.text(&None::<&str>), "");
/// assert_eq!(engine.query(&json!({"$gt": ""})), json!({}));
/// assert_eq!(engine.number("42", Some(0.0), Some(10.0)), Some(10.0));
/// assert_eq!(engine.email("nope"), None);
/// ```
pub struct Engine {
    policy: SanitizationPolicy,
    text: TextSanitizer,
    html: HtmlSanitizer,
    query: QuerySanitizer,
    urls: UrlSanitizer,
    emails: EmailSanitizer,
    filenames: FilenameSanitizer,
}

impl Engine {
    /// Compile `policy` into an engine.
    pub fn new(policy: SanitizationPolicy) -> Result<Self> {
        let text = TextSanitizer::new(
            policy.dangerous_elements(),
            policy.denied_text_schemes(),
            policy.max_text_length(),
            policy.max_passes(),
        )?;
        let html = HtmlSanitizer::new(&policy)?;
        let query = QuerySanitizer::new(
            policy.operator_prefix(),
            policy.forbidden_keys(),
            policy.max_query_depth(),
        );
        let urls = UrlSanitizer::new(policy.allowed_schemes());
        let emails = EmailSanitizer::new(policy.max_email_length())?;
        let filenames = FilenameSanitizer::new(policy.max_filename_length());

        Ok(Self {
            policy,
            text,
            html,
            query,
            urls,
            emails,
            filenames,
        })
    }

    /// Start configuring a custom engine.
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// The policy this engine was compiled from.
    pub fn policy(&self) -> &SanitizationPolicy {
        &self.policy
    }

    /// Sanitize free-form text with the policy's default length cap.
    ///
    /// Absent input yields `""`.
    pub fn text<T: Untrusted + ?Sized>(&self, input: &T) -> String {
        self.text_with_limit(input, self.policy.max_text_length())
    }

    /// Sanitize free-form text, capping the result at `max_length` characters.
    pub fn text_with_limit<T: Untrusted + ?Sized>(&self, input: &T, max_length: usize) -> String {
        match input.as_text() {
            Some(text) => self.text.sanitize_with_limit(&text, max_length),
            None => String::new(),
        }
    }

    /// Sanitize user-authored rich content. Absent input yields `""`.
    pub fn html<T: Untrusted + ?Sized>(&self, input: &T) -> String {
        match input.as_text() {
            Some(text) => self.html.sanitize(&text),
            None => String::new(),
        }
    }

    /// Strip operator and prototype-pollution keys from a filter object.
    pub fn query(&self, input: &Value) -> Value {
        self.query.sanitize(input)
    }

    /// Like [`query`](Self::query), also reporting what was removed.
    pub fn query_with_report(&self, input: &Value) -> (Value, QueryReport) {
        self.query.sanitize_with_report(input)
    }

    /// Normalize an upload filename. `None` if nothing usable remains.
    pub fn filename<T: Untrusted + ?Sized>(&self, input: &T) -> Option<String> {
        self.filenames.sanitize(&input.as_text()?)
    }

    /// Accept an absolute URL with an allowed scheme, normalized.
    pub fn url<T: Untrusted + ?Sized>(&self, input: &T) -> Option<String> {
        self.urls.sanitize(&input.as_text()?)
    }

    /// Lowercase, trim and structurally check an e-mail address.
    pub fn email<T: Untrusted + ?Sized>(&self, input: &T) -> Option<String> {
        self.emails.sanitize(&input.as_text()?)
    }

    /// Coerce to a finite number and clamp into `[min, max]`.
    pub fn number<T: Untrusted + ?Sized>(
        &self,
        input: &T,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Option<f64> {
        clamp_finite(input.as_number(), min, max)
    }
}

impl Default for Engine {
    /// The engine for the default policy.
    ///
    /// # Panics
    ///
    /// Never in practice: the default policy's patterns are fixed and valid.
    fn default() -> Self {
        Self::new(SanitizationPolicy::default()).expect("default policy compiles")
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("policy", &self.policy).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_text_is_empty() {
        let engine = Engine::default();
        assert_eq!(engine.text(&None::<String>), "");
        assert_eq!(engine.text(&json!(null)), "");
        assert_eq!(engine.html(&None::<&str>), "");
    }

    #[test]
    fn non_string_values_are_coerced_to_text() {
        let engine = Engine::default();
        assert_eq!(engine.text(&json!(12)), "12");
        assert_eq!(engine.text(&true), "true");
        assert_eq!(engine.text(&json!(["<b>"])), r#"["b"]"#);
    }

    #[test]
    fn text_limit_overrides_default() {
        let engine = Engine::default();
        assert_eq!(engine.text_with_limit("abcdef", 3), "abc");
    }

    #[test]
    fn scalar_sanitizers_return_none_for_absent_input() {
        let engine = Engine::default();
        assert_eq!(engine.filename(&None::<&str>), None);
        assert_eq!(engine.url(&json!(null)), None);
        assert_eq!(engine.email(&None::<String>), None);
        assert_eq!(engine.number(&None::<f64>, None, None), None);
    }

    #[test]
    fn scalar_sanitizers_accept_json_values() {
        let engine = Engine::default();
        assert_eq!(
            engine.url(&json!("https://example.com")).as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            engine.email(&json!("A@B.CO")).as_deref(),
            Some("a@b.co")
        );
        assert_eq!(engine.number(&json!("78.9"), None, None), Some(78.9));
        assert_eq!(engine.number(&json!(true), None, None), None);
    }

    #[test]
    fn custom_policy_flows_into_every_sanitizer() {
        let engine = Engine::builder()
            .allowed_tags(["b"])
            .allowed_schemes(["https"])
            .max_filename_length(4)
            .max_email_length(10)
            .operator_prefix('@')
            .build()
            .unwrap();

        assert_eq!(engine.html("<b>x</b><i>y</i>"), "<b>x</b>&lt;i&gt;y&lt;&#x2F;i&gt;");
        assert_eq!(engine.url("http://example.com"), None);
        assert_eq!(engine.filename("abcdef").as_deref(), Some("abcd"));
        assert_eq!(engine.email("long@example.com"), None);
        assert_eq!(engine.query(&json!({"@id": 1, "$ne": 2})), json!({"$ne": 2}));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
