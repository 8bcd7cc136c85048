//! Narrow validators/normalizers for single scalar fields.
//!
//! Every sanitizer here returns `Option<T>`: `Some` with the cleaned value,
//! or `None` when the input cannot be made safe.

mod email;
mod filename;
mod number;
mod url;

pub use email::EmailSanitizer;
pub use filename::FilenameSanitizer;
pub use number::clamp_finite;
pub use self::url::UrlSanitizer;
