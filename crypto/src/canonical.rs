//! # Canonical JSON Serialization
//!
//! One deterministic byte encoding for structured values, used by every
//! hash over identity data. Two logically identical inputs — same fields,
//! any construction order — must serialize to the same bytes, or the
//! "deterministic identifier" contract is a lie.
//!
//! ## Rules
//!
//! - Object keys sort lexicographically (by Unicode code point) at every
//!   nesting level. We sort explicitly instead of trusting the map type's
//!   iteration order, so a `preserve_order` feature flag somewhere in the
//!   dependency graph can't silently change every identifier we've ever
//!   issued.
//! - Arrays preserve order. Position is meaning; we don't editorialize.
//! - Scalars render in one fixed, type-stable form: JSON string escaping
//!   for strings, `serde_json::Number`'s shortest representation for
//!   numbers, `true`/`false`, `null`.
//! - Compact separators — no whitespace anywhere.
//! - Nesting deeper than [`CANONICAL_MAX_DEPTH`] is rejected. `serde_json`
//!   values can't be cyclic, so depth is the one structural hazard left,
//!   and a recursive serializer meeting a 10,000-level payload is how
//!   stacks die.

use serde_json::Value;

use crate::config::CANONICAL_MAX_DEPTH;
use crate::error::CryptoError;

/// Serialize a structured value to its canonical byte string.
///
/// # Errors
///
/// [`CryptoError::Input`] when the value nests too deeply to encode
/// safely. Everything a `serde_json::Value` can hold is otherwise
/// canonically serializable.
pub fn canonical_json(value: &Value) -> Result<Vec<u8>, CryptoError> {
    let mut out = String::new();
    write_value(value, &mut out, 0)?;
    Ok(out.into_bytes())
}

fn write_value(value: &Value, out: &mut String, depth: usize) -> Result<(), CryptoError> {
    if depth > CANONICAL_MAX_DEPTH {
        return Err(CryptoError::Input(format!(
            "structure nests deeper than {} levels",
            CANONICAL_MAX_DEPTH
        )));
    }

    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out, depth + 1)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Explicit sort — never trust the map's iteration order.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(&map[key.as_str()], out, depth + 1)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// JSON string escaping, matching `serde_json`'s encoder: the two
/// mandatory escapes, the short forms, and `\u00XX` for remaining
/// control characters.
fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
