//! KV3 emitter.
//!
//! The top level writes `"key" value` lines. Arrays put one element per
//! line with commas between (not after) elements; objects write
//! `"key" value` entries. Decoded trees wrap every plain object entry as
//! `[tag, value]`, so those entries naturally re-emit in bracket form.

use textkv_util::{Config, EncodeError, Map, Value};

use crate::escape;
use crate::{check_depth, tabs};

/// Serializes `value`, appending to `out`.
pub fn encode(value: &Value, cfg: &Config, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let map = match value {
        Value::Object(map) => map,
        _ => {
            return Err(EncodeError::Unsupported {
                kind: value.type_name(),
                reason: "top level must be an object",
            })
        }
    };

    for (i, (key, entry)) in map.iter().enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        escape::append_quoted(out, key);
        out.push(b' ');
        append_data(entry, cfg, 0, out)?;
    }
    Ok(())
}

fn append_data(value: &Value, cfg: &Config, depth: u32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::String(bytes) => {
            escape::append_quoted(out, bytes);
            Ok(())
        }
        Value::Number(n) => escape::append_number(out, cfg, *n),
        Value::Bool(b) => {
            out.extend_from_slice(if *b { b"true" } else { b"false" });
            Ok(())
        }
        Value::Null => {
            out.extend_from_slice(b"null");
            Ok(())
        }
        Value::Array(items) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            append_array(items, cfg, depth, out)
        }
        Value::Object(map) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            append_object(map, cfg, depth, out)
        }
    }
}

fn append_array(
    items: &[Value],
    cfg: &Config,
    depth: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    out.push(b'[');
    for (i, item) in items.iter().enumerate() {
        out.push(b'\n');
        append_data(item, cfg, depth, out)?;
        if i + 1 < items.len() {
            out.push(b',');
        }
    }
    out.push(b'\n');
    tabs(out, depth.saturating_sub(1));
    out.push(b']');
    Ok(())
}

fn append_object(
    map: &Map,
    cfg: &Config,
    depth: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    out.push(b'{');
    let depth = depth + 1;
    for (key, value) in map {
        out.push(b'\n');
        tabs(out, depth.saturating_sub(2));
        escape::append_quoted(out, key);
        out.push(b' ');
        append_data(value, cfg, depth, out)?;
    }
    out.push(b'\n');
    tabs(out, depth.saturating_sub(3));
    out.push(b'}');
    Ok(())
}
