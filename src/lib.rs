//! # input_guard
//!
//! Input sanitization and query-safety engine for web request handlers.
//!
//! ## Overview
//!
//! `input_guard` neutralizes untrusted input before it reaches storage or
//! rendering. Each sanitizer is a pure, total function: it accepts a value
//! of any shape (see [`Untrusted`]), never panics, and returns either a
//! cleaned value or an explicit `None`.
//!
//! | Input domain | Function | Result |
//! |--------------|----------|--------|
//! | Free-form text | [`sanitize_text`] | `String` |
//! | Rich content | [`sanitize_html`] | `String` |
//! | Filter objects | [`sanitize_query`] | `serde_json::Value` |
//! | Upload filenames | [`sanitize_filename`] | `Option<String>` |
//! | Redirect targets | [`sanitize_url`] | `Option<String>` |
//! | E-mail addresses | [`sanitize_email`] | `Option<String>` |
//! | Numbers | [`sanitize_number`] | `Option<f64>` |
//!
//! All of them are driven by one [`SanitizationPolicy`] compiled into an
//! [`Engine`]. The free functions use the process-wide engine returned by
//! [`global()`]; build your own with [`PolicyBuilder`] and either call it
//! directly or install it once with [`init()`].
//!
//! ## Quick start
//!
//! ```rust
//! use input_guard::{sanitize_email, sanitize_query, sanitize_text};
//! use serde_json::json;
//!
//! assert_eq!(sanitize_text(r#"<script>alert("XSS")</script>テスト"#), "テスト");
//! assert_eq!(sanitize_text("<div>テキスト</div>"), "divテキスト/div");
//!
//! let filter = sanitize_query(&json!({"user": {"$ne": null}, "__proto__": {}}));
//! assert_eq!(filter, json!({"user": {}}));
//!
//! assert_eq!(sanitize_email("TEST@EXAMPLE.COM").as_deref(), Some("test@example.com"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod escape;
pub mod input;
pub mod query;
pub mod sanitizer;
pub mod scalar;

pub use config::{PolicyBuilder, SanitizationPolicy};
pub use engine::Engine;
pub use error::{Result, SanitizeError};
pub use escape::{escape_attribute, escape_html, unescape_html};
pub use input::Untrusted;
pub use query::{QueryReport, QuerySanitizer};
pub use sanitizer::{
    CharStripper, HtmlSanitizer, RegexSanitizer, Sanitizer, SanitizerPipeline, TextSanitizer,
};
pub use scalar::{EmailSanitizer, FilenameSanitizer, UrlSanitizer, clamp_finite};

use std::sync::OnceLock;

use serde_json::Value;

// Global state for the optional singleton pattern
static GLOBAL: OnceLock<Engine> = OnceLock::new();

/// Install `engine` as the process-wide engine used by the free functions.
///
/// Call once at application startup, before any `sanitize_*` call.
///
/// # Errors
///
/// Returns [`SanitizeError::AlreadyInitialized`] if a global engine already
/// exists, including the default one created lazily by an earlier
/// [`global()`] or `sanitize_*` call.
pub fn init(engine: Engine) -> Result<&'static Engine> {
    GLOBAL
        .set(engine)
        .map_err(|_| SanitizeError::AlreadyInitialized)?;
    tracing::info!("Global sanitization engine installed");
    Ok(global())
}

/// The process-wide engine: the one passed to [`init()`], or the default
/// engine if none was installed.
pub fn global() -> &'static Engine {
    GLOBAL.get_or_init(Engine::default)
}

/// Sanitize free-form text with the global engine. See [`Engine::text`].
pub fn sanitize_text<T: Untrusted + ?Sized>(input: &T) -> String {
    global().text(input)
}

/// Sanitize free-form text with an explicit length cap. See [`Engine::text_with_limit`].
pub fn sanitize_text_with_limit<T: Untrusted + ?Sized>(input: &T, max_length: usize) -> String {
    global().text_with_limit(input, max_length)
}

/// Sanitize rich content with the global engine. See [`Engine::html`].
pub fn sanitize_html<T: Untrusted + ?Sized>(input: &T) -> String {
    global().html(input)
}

/// Strip dangerous keys from a filter object. See [`Engine::query`].
pub fn sanitize_query(input: &Value) -> Value {
    global().query(input)
}

/// Normalize an upload filename. See [`Engine::filename`].
pub fn sanitize_filename<T: Untrusted + ?Sized>(input: &T) -> Option<String> {
    global().filename(input)
}

/// Validate and normalize an absolute URL. See [`Engine::url`].
pub fn sanitize_url<T: Untrusted + ?Sized>(input: &T) -> Option<String> {
    global().url(input)
}

/// Normalize and check an e-mail address. See [`Engine::email`].
pub fn sanitize_email<T: Untrusted + ?Sized>(input: &T) -> Option<String> {
    global().email(input)
}

/// Coerce to a finite number and clamp. See [`Engine::number`].
pub fn sanitize_number<T: Untrusted + ?Sized>(
    input: &T,
    min: Option<f64>,
    max: Option<f64>,
) -> Option<f64> {
    global().number(input, min, max)
}
