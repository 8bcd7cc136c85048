//! Error types for the `input_guard` crate.
//!
//! Sanitizer calls never fail. These errors only surface while building a
//! policy or installing the global engine.

/// All errors that can occur while configuring the sanitization engine.
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// The policy is internally inconsistent or unsafe.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// A denylist pattern derived from the policy failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// [`init`](crate::init) was called after a global engine already existed.
    #[error("Global engine already initialized")]
    AlreadyInitialized,
}

/// A type alias for `Result<T, SanitizeError>`.
pub type Result<T> = std::result::Result<T, SanitizeError>;
