//! KV0 emitter.
//!
//! Map form writes `"key"<TAB>value` with `{…}` containers, newlines and
//! tab indentation when `keepln` is set. Only the first pair of the
//! top-level object is emitted, mirroring the decode side, and booleans
//! have no KV0 representation.
//!
//! Array form (`encode2`) writes containers as alternating pair lines:
//! arrays emit their elements two per line, and integer-keyed objects go
//! through array detection with the sparse-array policy first.

use textkv_util::{float, Config, EncodeError, Map, Value};

use crate::escape;
use crate::{check_depth, tabs};

/// Serializes `value` in map form, appending to `out`.
pub fn encode(value: &Value, cfg: &Config, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let map = top_level_object(value)?;
    if let Some((key, entry)) = map.first() {
        escape::append_quoted(out, key);
        out.push(b'\t');
        append_data(entry, cfg, 0, out)?;
    }
    Ok(())
}

/// Serializes `value` in array form, appending to `out`.
pub fn encode_array_form(value: &Value, cfg: &Config, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let map = top_level_object(value)?;
    if let Some((key, entry)) = map.first() {
        escape::append_quoted(out, key);
        out.push(b'\t');
        append_data_array_form(entry, cfg, 0, out)?;
    }
    Ok(())
}

fn top_level_object<'v>(value: &'v Value) -> Result<&'v Map, EncodeError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(EncodeError::Unsupported {
            kind: value.type_name(),
            reason: "top level must be an object",
        }),
    }
}

fn append_data(value: &Value, cfg: &Config, depth: u32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::String(bytes) => {
            escape::append_quoted(out, bytes);
            Ok(())
        }
        Value::Object(map) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            open_container(cfg, depth, out);
            for (key, entry) in map {
                entry_indent(cfg, depth, out);
                escape::append_quoted(out, key);
                out.push(b'\t');
                append_data(entry, cfg, depth, out)?;
                entry_break(cfg, out);
            }
            close_container(cfg, depth, out);
            Ok(())
        }
        Value::Array(items) => {
            // Map form has no array syntax; arrays render as objects
            // keyed by their 1-based indices.
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            open_container(cfg, depth, out);
            for (i, entry) in items.iter().enumerate() {
                entry_indent(cfg, depth, out);
                escape::append_quoted(out, float::format_g((i + 1) as f64, 14).as_bytes());
                out.push(b'\t');
                append_data(entry, cfg, depth, out)?;
                entry_break(cfg, out);
            }
            close_container(cfg, depth, out);
            Ok(())
        }
        Value::Null => {
            out.extend_from_slice(b"null");
            Ok(())
        }
        Value::Number(n) => escape::append_number(out, cfg, *n),
        Value::Bool(_) => Err(EncodeError::Unsupported {
            kind: "boolean",
            reason: "type not supported",
        }),
    }
}

fn append_data_array_form(
    value: &Value,
    cfg: &Config,
    depth: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match value {
        Value::String(bytes) => {
            escape::append_quoted(out, bytes);
            Ok(())
        }
        Value::Array(items) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            open_container(cfg, depth, out);
            let mut i = 0;
            while i < items.len() {
                entry_indent(cfg, depth, out);
                append_data_array_form(&items[i], cfg, depth, out)?;
                out.push(b'\t');
                match items.get(i + 1) {
                    Some(pair) => append_data_array_form(pair, cfg, depth, out)?,
                    None => out.extend_from_slice(b"null"),
                }
                entry_break(cfg, out);
                i += 2;
            }
            close_container(cfg, depth, out);
            Ok(())
        }
        Value::Object(map) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            let length = array_length(map, cfg)?;
            open_container(cfg, depth, out);
            if let Some(length) = length {
                let mut i = 1u64;
                while i <= length {
                    entry_indent(cfg, depth, out);
                    append_indexed(map, i, cfg, depth, out)?;
                    out.push(b'\t');
                    append_indexed(map, i + 1, cfg, depth, out)?;
                    entry_break(cfg, out);
                    i += 2;
                }
            }
            close_container(cfg, depth, out);
            Ok(())
        }
        Value::Null => {
            out.extend_from_slice(b"null");
            Ok(())
        }
        Value::Number(n) => escape::append_number(out, cfg, *n),
        Value::Bool(_) => Err(EncodeError::Unsupported {
            kind: "boolean",
            reason: "type not supported",
        }),
    }
}

/// Emits the value stored under the decimal key `index`, or `null` for a
/// hole.
fn append_indexed(
    map: &Map,
    index: u64,
    cfg: &Config,
    depth: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let key = float::format_g(index as f64, 14);
    match map.get(key.as_bytes()) {
        Some(value) => append_data_array_form(value, cfg, depth, out),
        None => {
            out.extend_from_slice(b"null");
            Ok(())
        }
    }
}

/// Array detection for integer-keyed objects. `Some(max_key)` means the
/// object reads as an array of that declared length; `None` means it does
/// not (and array form emits an empty body). Excessive sparseness raises
/// unless `encode_sparse_convert` downgrades it to `None`.
fn array_length(map: &Map, cfg: &Config) -> Result<Option<u64>, EncodeError> {
    let mut max = 0u64;
    let mut items = 0u64;

    for key in map.keys() {
        let parsed = std::str::from_utf8(key)
            .ok()
            .and_then(|text| text.parse::<f64>().ok());
        let k = match parsed {
            Some(k) if k.floor() == k && k >= 1.0 && k <= u64::MAX as f64 => k as u64,
            _ => return Ok(None),
        };
        max = max.max(k);
        items += 1;
    }

    if cfg.encode_sparse_ratio > 0
        && max > items.saturating_mul(cfg.encode_sparse_ratio as u64)
        && max > cfg.encode_sparse_safe as u64
    {
        if !cfg.encode_sparse_convert {
            return Err(EncodeError::Unsupported {
                kind: "object",
                reason: "excessively sparse array",
            });
        }
        return Ok(None);
    }

    Ok(Some(max))
}

fn open_container(cfg: &Config, depth: u32, out: &mut Vec<u8>) {
    if cfg.keepln {
        out.push(b'\n');
        tabs(out, depth - 1);
    }
    out.push(b'{');
    if cfg.keepln {
        out.push(b'\n');
    }
}

fn close_container(cfg: &Config, depth: u32, out: &mut Vec<u8>) {
    if cfg.keepln {
        tabs(out, depth - 1);
    }
    out.push(b'}');
}

fn entry_indent(cfg: &Config, depth: u32, out: &mut Vec<u8>) {
    if cfg.keepln {
        tabs(out, depth);
    }
}

fn entry_break(cfg: &Config, out: &mut Vec<u8>) {
    if cfg.keepln {
        out.push(b'\n');
    }
}
