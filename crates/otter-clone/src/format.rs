//! Inspection output for values
//!
//! Single-line, console-style rendering. A container reached again while it
//! is still being printed shows up as `[Circular]`.

use crate::value::Value;
use std::fmt::{self, Write};

/// Render a value the way a console would print it
pub fn inspect(value: &Value) -> String {
    value.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut in_progress = Vec::new();
        write_value(f, self, &mut in_progress)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, in_progress: &mut Vec<usize>) -> fmt::Result {
    match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Number(n) => write_number(f, *n),
        Value::String(s) => write_quoted(f, s),
        Value::Date(date) => f.write_str(&date.to_iso_string()),
        Value::RegExp(re) => write!(f, "{}", re),
        Value::Function(func) if func.name().is_empty() => f.write_str("[Function (anonymous)]"),
        Value::Function(func) => write!(f, "[Function: {}]", func.name()),
        Value::Array(arr) => {
            let Some(addr) = enter(value, in_progress) else {
                return f.write_str("[Circular]");
            };
            let elements = arr.elements();
            if elements.is_empty() {
                f.write_str("[]")?;
            } else {
                f.write_str("[ ")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_value(f, element, in_progress)?;
                }
                f.write_str(" ]")?;
            }
            leave(addr, in_progress);
            Ok(())
        }
        Value::Object(obj) => {
            let Some(addr) = enter(value, in_progress) else {
                return f.write_str("[Circular]");
            };
            if let Some(class) = obj.class() {
                write!(f, "{} ", class.name())?;
            }
            let entries = obj.own_enumerable_entries();
            if entries.is_empty() {
                f.write_str("{}")?;
            } else {
                f.write_str("{ ")?;
                for (i, (key, member)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_key(f, key)?;
                    f.write_str(": ")?;
                    write_value(f, member, in_progress)?;
                }
                f.write_str(" }")?;
            }
            leave(addr, in_progress);
            Ok(())
        }
    }
}

fn enter(value: &Value, in_progress: &mut Vec<usize>) -> Option<usize> {
    let addr = value.heap_addr()?;
    if in_progress.contains(&addr) {
        return None;
    }
    in_progress.push(addr);
    Some(addr)
}

fn leave(addr: usize, in_progress: &mut Vec<usize>) {
    if in_progress.last() == Some(&addr) {
        in_progress.pop();
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", n)
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    let mut chars = key.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if identifier {
        f.write_str(key)
    } else {
        write_quoted(f, key)
    }
}

/// Single quotes unless the text contains them, then double quotes, then
/// backticks. Falls back to escaped single quotes when all three appear.
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let quote = if !text.contains('\'') {
        '\''
    } else if !text.contains('"') {
        '"'
    } else if !text.contains('`') && !text.contains("${") {
        '`'
    } else {
        '\''
    };

    f.write_char(quote)?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c if c < ' ' || c == '\u{7f}' => write!(f, "\\x{:02X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}
