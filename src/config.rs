//! Builder for the sanitization policy shared by every sanitizer.

use crate::engine::Engine;
use crate::error::{Result, SanitizeError};

const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "b", "i", "em", "strong", "a", "p", "br", "ul", "ol", "li", "blockquote", "code", "pre", "h1",
    "h2", "h3", "h4", "h5", "h6",
];
const DEFAULT_ALLOWED_ATTRIBUTES: &[&str] = &["href", "title", "target", "rel", "class"];
const DEFAULT_URL_ATTRIBUTES: &[&str] = &["href"];
const DEFAULT_DANGEROUS_ELEMENTS: &[&str] = &["script", "iframe", "object", "embed", "applet", "style"];
const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https"];
const DEFAULT_DENIED_SCHEMES: &[&str] = &["javascript", "vbscript"];
const DEFAULT_FORBIDDEN_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Attribute names that can never be allowlisted.
const UNSAFE_ATTRIBUTES: &[&str] = &["style", "srcdoc", "formaction"];

/// A validated, immutable sanitization policy.
///
/// Obtain one from [`PolicyBuilder::policy`], or let
/// [`PolicyBuilder::build`] compile it straight into an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationPolicy {
    allowed_tags: Vec<String>,
    allowed_attributes: Vec<String>,
    url_attributes: Vec<String>,
    dangerous_elements: Vec<String>,
    allowed_schemes: Vec<String>,
    denied_text_schemes: Vec<String>,
    forbidden_keys: Vec<String>,
    operator_prefix: char,
    max_text_length: usize,
    max_filename_length: usize,
    max_email_length: usize,
    max_query_depth: usize,
    max_passes: usize,
}

impl SanitizationPolicy {
    /// HTML tags restored as real markup by the HTML sanitizer.
    pub fn allowed_tags(&self) -> &[String] {
        &self.allowed_tags
    }

    /// Attributes kept on restored tags.
    pub fn allowed_attributes(&self) -> &[String] {
        &self.allowed_attributes
    }

    /// Attributes whose values are URLs and go through the URL sanitizer.
    pub fn url_attributes(&self) -> &[String] {
        &self.url_attributes
    }

    /// Elements removed together with their content.
    pub fn dangerous_elements(&self) -> &[String] {
        &self.dangerous_elements
    }

    /// URL schemes accepted by the URL sanitizer.
    pub fn allowed_schemes(&self) -> &[String] {
        &self.allowed_schemes
    }

    /// Scheme tokens (`javascript:`) removed from plain text.
    pub fn denied_text_schemes(&self) -> &[String] {
        &self.denied_text_schemes
    }

    /// Query keys removed regardless of prefix.
    pub fn forbidden_keys(&self) -> &[String] {
        &self.forbidden_keys
    }

    /// Leading character marking a query operator key.
    pub fn operator_prefix(&self) -> char {
        self.operator_prefix
    }

    /// Default text length cap, in characters.
    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    /// Filename length cap, in characters.
    pub fn max_filename_length(&self) -> usize {
        self.max_filename_length
    }

    /// E-mail length cap, in characters.
    pub fn max_email_length(&self) -> usize {
        self.max_email_length
    }

    /// Deepest container level the query sanitizer descends into.
    pub fn max_query_depth(&self) -> usize {
        self.max_query_depth
    }

    /// Upper bound on repeated denylist passes over one input.
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        PolicyBuilder::new().into_policy()
    }
}

/// Builder for a [`SanitizationPolicy`] and the [`Engine`] compiled from it.
///
/// Provides a fluent API over the allowlists, denylists and bounds. Names
/// are trimmed and lowercased; duplicates are ignored.
///
/// # Example
///
/// ```
/// use input_guard::PolicyBuilder;
///
/// let engine = PolicyBuilder::new()
///     .allow_tag("u")
///     .max_text_length(280)
///     .max_query_depth(8)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.html("<u>hi</u>"), "<u>hi</u>");
/// assert_eq!(engine.text(&"x".repeat(500)).len(), 280);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    allowed_tags: Vec<String>,
    allowed_attributes: Vec<String>,
    url_attributes: Vec<String>,
    dangerous_elements: Vec<String>,
    allowed_schemes: Vec<String>,
    denied_text_schemes: Vec<String>,
    forbidden_keys: Vec<String>,
    operator_prefix: char,
    max_text_length: usize,
    max_filename_length: usize,
    max_email_length: usize,
    max_query_depth: usize,
    max_passes: usize,
}

fn names<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        push_name(&mut out, item.as_ref());
    }
    out
}

fn push_name(list: &mut Vec<String>, name: &str) {
    let name = name.trim().to_ascii_lowercase();
    if !list.contains(&name) {
        list.push(name);
    }
}

impl PolicyBuilder {
    /// Create a builder with the default policy.
    ///
    /// Defaults: the formatting tag allowlist (`b i em strong a p br ul ol li
    /// blockquote code pre h1`-`h6`), attributes `href title target rel
    /// class`, `href` as URL attribute, dangerous elements `script iframe
    /// object embed applet style`, schemes `http https`, denied text
    /// schemes `javascript vbscript`, forbidden keys `__proto__
    /// constructor prototype`, operator prefix `$`, text cap 10 000,
    /// filename cap 255, e-mail cap 254, query depth 32, 32 passes.
    pub fn new() -> Self {
        Self {
            allowed_tags: names(DEFAULT_ALLOWED_TAGS),
            allowed_attributes: names(DEFAULT_ALLOWED_ATTRIBUTES),
            url_attributes: names(DEFAULT_URL_ATTRIBUTES),
            dangerous_elements: names(DEFAULT_DANGEROUS_ELEMENTS),
            allowed_schemes: names(DEFAULT_ALLOWED_SCHEMES),
            denied_text_schemes: names(DEFAULT_DENIED_SCHEMES),
            forbidden_keys: DEFAULT_FORBIDDEN_KEYS.iter().map(|k| k.to_string()).collect(),
            operator_prefix: '$',
            max_text_length: 10_000,
            max_filename_length: 255,
            max_email_length: 254,
            max_query_depth: 32,
            max_passes: 32,
        }
    }

    /// Replace the HTML tag allowlist.
    pub fn allowed_tags<S: AsRef<str>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.allowed_tags = names(tags);
        self
    }

    /// Add one tag to the HTML tag allowlist.
    pub fn allow_tag(mut self, tag: &str) -> Self {
        push_name(&mut self.allowed_tags, tag);
        self
    }

    /// Replace the attribute allowlist.
    pub fn allowed_attributes<S: AsRef<str>>(mut self, attrs: impl IntoIterator<Item = S>) -> Self {
        self.allowed_attributes = names(attrs);
        self
    }

    /// Add one attribute to the attribute allowlist.
    pub fn allow_attribute(mut self, attr: &str) -> Self {
        push_name(&mut self.allowed_attributes, attr);
        self
    }

    /// Replace the set of attributes whose values are URLs.
    pub fn url_attributes<S: AsRef<str>>(mut self, attrs: impl IntoIterator<Item = S>) -> Self {
        self.url_attributes = names(attrs);
        self
    }

    /// Replace the set of elements removed together with their content.
    pub fn dangerous_elements<S: AsRef<str>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.dangerous_elements = names(tags);
        self
    }

    /// Replace the URL scheme allowlist.
    pub fn allowed_schemes<S: AsRef<str>>(mut self, schemes: impl IntoIterator<Item = S>) -> Self {
        self.allowed_schemes = names(schemes);
        self
    }

    /// Replace the scheme tokens removed from plain text.
    pub fn denied_text_schemes<S: AsRef<str>>(
        mut self,
        schemes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.denied_text_schemes = names(schemes);
        self
    }

    /// Add a query key that is removed wherever it appears. Compared exactly.
    pub fn forbid_key(mut self, key: &str) -> Self {
        if !self.forbidden_keys.iter().any(|k| k == key) {
            self.forbidden_keys.push(key.to_string());
        }
        self
    }

    /// Leading character marking a query operator key.
    pub fn operator_prefix(mut self, prefix: char) -> Self {
        self.operator_prefix = prefix;
        self
    }

    /// Default text length cap, in characters.
    pub fn max_text_length(mut self, len: usize) -> Self {
        self.max_text_length = len;
        self
    }

    /// Filename length cap, in characters.
    pub fn max_filename_length(mut self, len: usize) -> Self {
        self.max_filename_length = len;
        self
    }

    /// E-mail length cap, in characters.
    pub fn max_email_length(mut self, len: usize) -> Self {
        self.max_email_length = len;
        self
    }

    /// Deepest container level the query sanitizer descends into.
    pub fn max_query_depth(mut self, depth: usize) -> Self {
        self.max_query_depth = depth;
        self
    }

    /// Upper bound on repeated denylist passes over one input.
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    /// Validate the settings and return the resulting policy.
    pub fn policy(self) -> Result<SanitizationPolicy> {
        self.validate()?;
        Ok(self.into_policy())
    }

    /// Validate the settings and compile them into an [`Engine`].
    pub fn build(self) -> Result<Engine> {
        Engine::new(self.policy()?)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SanitizeError::InvalidPolicy(msg));

        for (what, list) in [
            ("tag", &self.allowed_tags),
            ("dangerous element", &self.dangerous_elements),
        ] {
            if let Some(bad) = list.iter().find(|n| !is_tag_name(n)) {
                return invalid(format!("{what} name {bad:?} is not alphanumeric"));
            }
        }
        for list in [&self.allowed_attributes, &self.url_attributes] {
            if let Some(bad) = list.iter().find(|n| !is_attribute_name(n)) {
                return invalid(format!("attribute name {bad:?} is not valid"));
            }
        }
        for list in [&self.allowed_schemes, &self.denied_text_schemes] {
            if let Some(bad) = list.iter().find(|n| !is_scheme(n)) {
                return invalid(format!("scheme {bad:?} is not valid"));
            }
        }

        if let Some(tag) = self
            .allowed_tags
            .iter()
            .find(|t| self.dangerous_elements.contains(t))
        {
            return invalid(format!("tag {tag:?} is both allowed and dangerous"));
        }
        if let Some(attr) = self
            .allowed_attributes
            .iter()
            .find(|a| a.starts_with("on") || UNSAFE_ATTRIBUTES.contains(&a.as_str()))
        {
            return invalid(format!("attribute {attr:?} cannot be allowlisted"));
        }
        if self.allowed_schemes.is_empty() {
            return invalid("at least one URL scheme must be allowed".into());
        }
        if let Some(scheme) = self
            .allowed_schemes
            .iter()
            .find(|s| self.denied_text_schemes.contains(s))
        {
            return invalid(format!("scheme {scheme:?} is both allowed and denied"));
        }
        if self.forbidden_keys.iter().any(|k| k.is_empty()) {
            return invalid("forbidden query keys must not be empty".into());
        }

        for (what, value) in [
            ("max_text_length", self.max_text_length),
            ("max_filename_length", self.max_filename_length),
            ("max_email_length", self.max_email_length),
            ("max_query_depth", self.max_query_depth),
            ("max_passes", self.max_passes),
        ] {
            if value == 0 {
                return invalid(format!("{what} must be greater than zero"));
            }
        }

        Ok(())
    }

    fn into_policy(self) -> SanitizationPolicy {
        SanitizationPolicy {
            allowed_tags: self.allowed_tags,
            allowed_attributes: self.allowed_attributes,
            url_attributes: self.url_attributes,
            dangerous_elements: self.dangerous_elements,
            allowed_schemes: self.allowed_schemes,
            denied_text_schemes: self.denied_text_schemes,
            forbidden_keys: self.forbidden_keys,
            operator_prefix: self.operator_prefix,
            max_text_length: self.max_text_length,
            max_filename_length: self.max_filename_length,
            max_email_length: self.max_email_length,
            max_query_depth: self.max_query_depth,
            max_passes: self.max_passes,
        }
    }
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

fn is_scheme(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(builder: PolicyBuilder) -> String {
        match builder.policy() {
            Err(SanitizeError::InvalidPolicy(msg)) => msg,
            other => panic!("expected InvalidPolicy, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let policy = PolicyBuilder::new().policy().unwrap();
        assert_eq!(policy, SanitizationPolicy::default());
        assert_eq!(policy.max_text_length(), 10_000);
        assert_eq!(policy.max_filename_length(), 255);
        assert_eq!(policy.operator_prefix(), '$');
        assert!(policy.allowed_tags().iter().any(|t| t == "blockquote"));
        assert!(policy.dangerous_elements().iter().any(|t| t == "applet"));
        assert_eq!(policy.allowed_schemes(), ["http", "https"]);
    }

    #[test]
    fn names_are_normalized_and_deduplicated() {
        let policy = PolicyBuilder::new()
            .allowed_tags([" B ", "b", "SPAN"])
            .allow_tag("span")
            .policy()
            .unwrap();
        assert_eq!(policy.allowed_tags(), ["b", "span"]);
    }

    #[test]
    fn allowed_and_dangerous_tags_must_not_overlap() {
        let msg = rejected(PolicyBuilder::new().allow_tag("SCRIPT"));
        assert!(msg.contains("script"));
    }

    #[test]
    fn event_handler_attributes_cannot_be_allowed() {
        rejected(PolicyBuilder::new().allow_attribute("onclick"));
        rejected(PolicyBuilder::new().allow_attribute("style"));
    }

    #[test]
    fn denied_schemes_cannot_be_allowed() {
        rejected(PolicyBuilder::new().allowed_schemes(["https", "javascript"]));
        rejected(PolicyBuilder::new().allowed_schemes(Vec::<String>::new()));
    }

    #[test]
    fn malformed_names_are_rejected() {
        rejected(PolicyBuilder::new().allow_tag("a b"));
        rejected(PolicyBuilder::new().allow_tag(""));
        rejected(PolicyBuilder::new().allow_attribute("x=y"));
        rejected(PolicyBuilder::new().allowed_schemes(["1http"]));
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let msg = rejected(PolicyBuilder::new().max_text_length(0));
        assert!(msg.contains("max_text_length"));
        rejected(PolicyBuilder::new().max_query_depth(0));
        rejected(PolicyBuilder::new().max_passes(0));
    }

    #[test]
    fn forbidden_keys_are_exact_and_deduplicated() {
        let policy = PolicyBuilder::new()
            .forbid_key("__proto__")
            .forbid_key("Where")
            .policy()
            .unwrap();
        assert_eq!(
            policy.forbidden_keys(),
            ["__proto__", "constructor", "prototype", "Where"]
        );
        rejected(PolicyBuilder::new().forbid_key(""));
    }
}
