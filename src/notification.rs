//! Free-form camera notifications.
//!
//! The service reports notifications either as bare codes (`"low_battery"`)
//! or as small objects (`{"survivalModeStart": "..."}`). Both are surfaced to
//! callers as text; objects use a `{'key': 'value'}` rendering.

use serde_json::Value;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    PlainText(String),
    Structured(Vec<(String, Value)>),
}

impl From<&Value> for Notification {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => Notification::PlainText(text.clone()),
            Value::Object(entries) => Notification::Structured(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => Notification::PlainText(Repr(other).to_string()),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::PlainText(text) => f.write_str(text),
            Notification::Structured(entries) => {
                write_mapping(f, entries.iter().map(|(key, value)| (key, value)))
            }
        }
    }
}

/// Key/value textual rendering of an arbitrary JSON value.
struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Number(number) => match number.as_f64() {
                Some(float) if number.is_f64() => write_float(f, float),
                _ => write!(f, "{}", number),
            },
            Value::String(text) => write_quoted(f, text),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Repr(item))?;
                }
                f.write_char(']')
            }
            Value::Object(entries) => write_mapping(f, entries.iter()),
        }
    }
}

fn write_mapping<'a>(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> fmt::Result {
    f.write_char('{')?;
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_quoted(f, key)?;
        write!(f, ": {}", Repr(value))?;
    }
    f.write_char('}')
}

/// Shortest round-trip digits; exponent form below 1e-4 and from 1e16 up
/// (`1e-05`, `1e+20`), otherwise fixed with at least one decimal (`100.0`).
fn write_float(f: &mut fmt::Formatter<'_>, float: f64) -> fmt::Result {
    let scientific = format!("{:e}", float);
    let (mantissa, exponent) = scientific.split_once('e').ok_or(fmt::Error)?;
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let fixed = float.to_string();
    if fixed.contains('.') {
        f.write_str(&fixed)
    } else {
        write!(f, "{}.0", fixed)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    // Single quotes unless the text holds a single quote and no double quote.
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    f.write_char(quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\x{:02x}", c as u32)?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}
