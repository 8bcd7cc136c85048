//! Allowlist-based HTML sanitizer for user-authored rich content.

use std::collections::HashSet;
use std::fmt::Write;

use regex::{Captures, Regex};

use super::{RegexSanitizer, Sanitizer, SanitizerPipeline};
use crate::config::SanitizationPolicy;
use crate::error::Result;
use crate::escape::{escape_attribute, escape_html, unescape_html};
use crate::scalar::UrlSanitizer;

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// An escaped tag: `&lt;` + optional `/` + name + attributes + optional `/` + `&gt;`.
///
/// Outside quotes the attribute section may contain only text, `&amp;` and
/// `&#x2F;`. Quoted values are consumed as units between `&quot;` or `&#x27;`
/// pairs and may also hold the escaped brackets and the other quote. A tag
/// with an unbalanced quote or a bare escaped bracket does not match and
/// stays inert.
const ESCAPED_TAG: &str = concat!(
    r"&lt;(&#x2F;)?([a-zA-Z][a-zA-Z0-9]*)",
    r"((?:\s(?:[^&]|&(?:amp|#x2F);",
    r"|&quot;(?:[^&]|&(?:amp|lt|gt|#x27|#x2F);)*?&quot;",
    r"|&#x27;(?:[^&]|&(?:amp|lt|gt|quot|#x2F);)*?&#x27;)*?)?)",
    r"\s*(?:&#x2F;)?&gt;",
);

/// One attribute: name, then an optional double-quoted, single-quoted or bare value.
const ATTRIBUTE: &str = r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#;

/// Sanitizer for rich content.
///
/// 1. Dangerous elements (`script`, `iframe`, ...) are removed with their content.
/// 2. Everything left is entity-escaped, so it renders as text.
/// 3. Allowlisted tags are restored as real tags, carrying only allowlisted
///    attributes. URL-valued attributes go through the [`UrlSanitizer`] and
///    are dropped if rejected; other values are re-escaped.
///
/// Tags outside the allowlist stay escaped.
///
/// # Example
///
/// ```
/// use input_guard::{HtmlSanitizer, PolicyBuilder, Sanitizer};
///
/// let policy = PolicyBuilder::new().policy().unwrap();
/// let sanitizer = HtmlSanitizer::new(&policy).unwrap();
///
/// let html = r#"<p onclick="x()">Hi <b>there</b><script>steal()</script></p>"#;
/// assert_eq!(sanitizer.sanitize(html), "<p>Hi <b>there</b></p>");
/// ```
pub struct HtmlSanitizer {
    blocks: SanitizerPipeline,
    max_passes: usize,
    tag: Regex,
    attribute: Regex,
    allowed_tags: HashSet<String>,
    allowed_attributes: HashSet<String>,
    url_attributes: HashSet<String>,
    urls: UrlSanitizer,
}

impl HtmlSanitizer {
    /// Compile an HTML sanitizer from the policy's tag, attribute and scheme lists.
    pub fn new(policy: &SanitizationPolicy) -> Result<Self> {
        let mut blocks = SanitizerPipeline::new();
        blocks.add(RegexSanitizer::element_blocks(policy.dangerous_elements())?);

        Ok(Self {
            blocks,
            max_passes: policy.max_passes(),
            tag: Regex::new(ESCAPED_TAG)?,
            attribute: Regex::new(ATTRIBUTE)?,
            allowed_tags: policy.allowed_tags().iter().cloned().collect(),
            allowed_attributes: policy.allowed_attributes().iter().cloned().collect(),
            url_attributes: policy.url_attributes().iter().cloned().collect(),
            urls: UrlSanitizer::new(policy.allowed_schemes()),
        })
    }

    fn restore_tag(&self, caps: &Captures<'_>) -> String {
        let name = caps[2].to_ascii_lowercase();
        if !self.allowed_tags.contains(&name) {
            return caps[0].to_string();
        }

        let is_void = VOID_ELEMENTS.contains(&name.as_str());
        if caps.get(1).is_some() {
            if is_void {
                return caps[0].to_string();
            }
            return format!("</{name}>");
        }

        let attrs = self.render_attributes(&unescape_html(&caps[3]));
        format!("<{name}{attrs}>")
    }

    fn render_attributes(&self, raw: &str) -> String {
        let mut seen: Vec<String> = Vec::new();
        let mut out = String::new();

        for caps in self.attribute.captures_iter(raw) {
            let name = caps[1].to_ascii_lowercase();
            if !self.allowed_attributes.contains(&name) || seen.contains(&name) {
                continue;
            }

            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());

            let value = if self.url_attributes.contains(&name) {
                match self.urls.sanitize(value) {
                    Some(url) => url,
                    None => {
                        tracing::debug!(attribute = %name, "Dropping attribute with rejected URL");
                        continue;
                    }
                }
            } else {
                value.to_string()
            };

            let _ = write!(out, " {name}=\"{}\"", escape_attribute(&value));
            seen.push(name);
        }

        out
    }
}

impl Sanitizer for HtmlSanitizer {
    fn sanitize(&self, input: &str) -> String {
        let Some(without_blocks) = self.blocks.sanitize_until_stable(input, self.max_passes) else {
            tracing::warn!(
                len = input.len(),
                max_passes = self.max_passes,
                "HTML did not stabilise within the pass budget, discarding"
            );
            return String::new();
        };

        let escaped = escape_html(&without_blocks);
        self.tag
            .replace_all(&escaped, |caps: &Captures<'_>| self.restore_tag(caps))
            .into_owned()
    }
}
