//! HTML entity escaping primitives shared by the text and HTML sanitizers.
//!
//! All functions return [`Cow::Borrowed`] when the input needs no change.

use std::borrow::Cow;

/// Escape `& < > " ' /` so the result renders as inert text in element content.
///
/// # Example
///
/// ```
/// use input_guard::escape_html;
///
/// assert_eq!(escape_html("<b>"), "&lt;b&gt;");
/// assert_eq!(escape_html("a </b>"), "a &lt;&#x2F;b&gt;");
/// ```
pub fn escape_html(input: &str) -> Cow<'_, str> {
    html_escape::encode_safe(input)
}

/// Escape a value for use inside a double- or single-quoted attribute.
///
/// Unlike [`escape_html`], `/` is left alone so URLs stay readable. Backticks
/// are escaped as well.
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    match html_escape::encode_quoted_attribute(input) {
        Cow::Borrowed(clean) if !clean.contains('`') => Cow::Borrowed(clean),
        escaped => Cow::Owned(escaped.replace('`', "&#x60;")),
    }
}

/// Decode HTML entities in a single left-to-right pass.
///
/// Unknown or malformed references are left untouched. Because decoding is a
/// single pass, `&amp;lt;` becomes `&lt;`, never `<`.
///
/// # Example
///
/// ```
/// use input_guard::unescape_html;
///
/// assert_eq!(unescape_html("&lt;p&gt; &#x2F; &#39;"), "<p> / '");
/// assert_eq!(unescape_html("&amp;lt;"), "&lt;");
/// ```
pub fn unescape_html(input: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(input)
}
