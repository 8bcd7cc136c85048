//! The [`Untrusted`] trait: how loosely-typed request values are coerced
//! before a sanitizer sees them.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Containers nested at least this deep render as `null` in text form.
pub const MAX_TEXT_DEPTH: usize = 32;

/// A value of unknown shape and provenance.
///
/// Implemented for strings, numbers, booleans, [`serde_json::Value`],
/// references and `Option`s of any of these, so a handler can pass a raw
/// request field straight into a sanitizer.
///
/// `None` and JSON `null` are "absent": they have no text and no number.
///
/// # Example
///
/// ```
/// use input_guard::Untrusted;
/// use serde_json::json;
///
/// assert_eq!(json!(null).as_text(), None);
/// assert_eq!(json!(12).as_text().as_deref(), Some("12"));
/// assert_eq!(" 78.9 ".as_number(), Some(78.9));
/// assert_eq!(None::<&str>.as_number(), None);
/// ```
pub trait Untrusted {
    /// Text form of the value, or `None` if absent.
    ///
    /// Arrays and objects render as compact JSON; containers at depth
    /// [`MAX_TEXT_DEPTH`] or deeper render as `null`.
    fn as_text(&self) -> Option<Cow<'_, str>>;

    /// Numeric form of the value.
    ///
    /// Strings are trimmed and parsed as decimal floating point. Booleans,
    /// containers and absent values have no numeric form. The result may be
    /// non-finite; callers filter that.
    fn as_number(&self) -> Option<f64>;
}

fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Compact JSON rendering with a nesting bound, so hostile input cannot
/// exhaust the stack.
fn write_json(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Array(_) | Value::Object(_) if depth >= MAX_TEXT_DEPTH => out.push_str("null"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(item, depth + 1, out);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(map, depth, out),
        leaf => out.push_str(&leaf.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, depth: usize, out: &mut String) {
    out.push('{');
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::from(key.as_str()).to_string());
        out.push(':');
        write_json(item, depth + 1, out);
    }
    out.push('}');
}

impl Untrusted for str {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn as_number(&self) -> Option<f64> {
        parse_number(self)
    }
}

impl Untrusted for String {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        self.as_str().as_text()
    }

    fn as_number(&self) -> Option<f64> {
        self.as_str().as_number()
    }
}

impl Untrusted for Value {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Array(_) | Value::Object(_) => {
                let mut out = String::new();
                write_json(self, 0, &mut out);
                Some(Cow::Owned(out))
            }
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }
}

impl Untrusted for bool {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "true" } else { "false" }))
    }

    fn as_number(&self) -> Option<f64> {
        None
    }
}

macro_rules! untrusted_number {
    ($($ty:ty),*) => {
        $(
            impl Untrusted for $ty {
                fn as_text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }

                fn as_number(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

untrusted_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Untrusted + ?Sized> Untrusted for &T {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        (**self).as_text()
    }

    fn as_number(&self) -> Option<f64> {
        (**self).as_number()
    }
}

impl<T: Untrusted> Untrusted for Option<T> {
    fn as_text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|v| v.as_text())
    }

    fn as_number(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.as_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_values_have_no_text() {
        assert_eq!(None::<String>.as_text(), None);
        assert_eq!(json!(null).as_text(), None);
        assert_eq!(Some(json!(null)).as_text(), None);
    }

    #[test]
    fn scalars_render_as_text() {
        assert_eq!("abc".as_text().as_deref(), Some("abc"));
        assert_eq!(42_i64.as_text().as_deref(), Some("42"));
        assert_eq!(true.as_text().as_deref(), Some("true"));
        assert_eq!(json!(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(json!("x").as_text().as_deref(), Some("x"));
    }

    #[test]
    fn containers_render_as_json() {
        assert_eq!(json!([1, "a"]).as_text().as_deref(), Some(r#"[1,"a"]"#));
        assert_eq!(json!({"k": true}).as_text().as_deref(), Some(r#"{"k":true}"#));
    }

    #[test]
    fn nested_containers_render_with_escaped_keys() {
        let value = json!({"a\"b": [1, {"c": null}], "d": "x\ny"});
        assert_eq!(
            value.as_text().as_deref(),
            Some(r#"{"a\"b":[1,{"c":null}],"d":"x\ny"}"#)
        );
    }

    #[test]
    fn containers_past_the_depth_bound_render_as_null() {
        let mut value = json!(1);
        for _ in 0..MAX_TEXT_DEPTH + 5 {
            value = json!([value]);
        }
        let expected = format!(
            "{}null{}",
            "[".repeat(MAX_TEXT_DEPTH),
            "]".repeat(MAX_TEXT_DEPTH)
        );
        assert_eq!(value.as_text().as_deref(), Some(expected.as_str()));
        assert_eq!(json!({"k": 1}).as_text().as_deref(), Some(r#"{"k":1}"#));
    }

    #[test]
    fn strings_parse_as_numbers() {
        assert_eq!("123".as_number(), Some(123.0));
        assert_eq!(" 78.9\n".as_number(), Some(78.9));
        assert_eq!("-1e3".as_number(), Some(-1000.0));
        assert_eq!("abc".as_number(), None);
        assert_eq!("".as_number(), None);
        assert_eq!("12px".as_number(), None);
    }

    #[test]
    fn numbers_and_values_coerce() {
        assert_eq!(456_i32.as_number(), Some(456.0));
        assert_eq!(Untrusted::as_number(&json!(7)), Some(7.0));
        assert_eq!(Untrusted::as_number(&json!("8")), Some(8.0));
        assert_eq!(json!(true).as_number(), None);
        assert_eq!(json!([1]).as_number(), None);
        assert_eq!(true.as_number(), None);
    }

    #[test]
    fn references_and_options_delegate() {
        let owned = String::from("9");
        assert_eq!((&owned).as_number(), Some(9.0));
        assert_eq!(Some("10").as_number(), Some(10.0));
        assert_eq!(Some(&json!("hi")).as_text().as_deref(), Some("hi"));
    }
}
