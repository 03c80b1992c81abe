//! KV1 emitter.
//!
//! Map form writes `key=value` lines with `{…}` objects and `[…]` arrays;
//! keys are bare, string values quoted. Array mode reproduces the
//! flattened shape the array-mode parser builds: alternating entries pair
//! back into lines, and an array led by the `__IsArray__` sentinel emits
//! as the bare bracket form.

use textkv_util::{Config, EncodeError, Map, Value, KV1_ARRAY_SENTINEL};

use crate::escape;
use crate::{check_depth, tabs};

/// Serializes `value` in map form, appending to `out`.
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
        escape::append_escaped(out, key);
        out.push(b'=');
        append_data(entry, cfg, 0, true, out)?;
    }
    Ok(())
}

/// Serializes a flattened tree (array-mode), appending to `out`.
pub fn encode_array(value: &Value, cfg: &Config, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(EncodeError::Unsupported {
                kind: value.type_name(),
                reason: "top level must be an array",
            })
        }
    };

    if leads_with_sentinel(items) {
        return append_flattened(items, cfg, 1, false, out);
    }

    let mut i = 0;
    while i < items.len() {
        if i > 0 {
            out.push(b'\n');
        }
        let entry = &items[i];
        i += 1;
        append_data_flat(entry, cfg, 0, true, out)?;
        if !matches!(entry, Value::Array(_) | Value::Object(_)) {
            // Scalars pair with the following item on the same line.
            match items.get(i) {
                Some(pair) => append_data_flat(pair, cfg, 0, true, out)?,
                None => out.extend_from_slice(b"null"),
            }
            i += 1;
        }
    }
    Ok(())
}

fn append_data(
    value: &Value,
    cfg: &Config,
    depth: u32,
    quote: bool,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match value {
        Value::String(bytes) => {
            if quote {
                escape::append_quoted(out, bytes);
            } else {
                escape::append_escaped(out, bytes);
            }
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
        Value::Object(map) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            append_object(map, cfg, depth, out)
        }
        Value::Array(items) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            append_array(items, cfg, depth, out)
        }
    }
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
        escape::append_escaped(out, key);
        out.push(b'=');
        append_data(value, cfg, depth, true, out)?;
    }
    out.push(b'\n');
    tabs(out, depth.saturating_sub(3));
    out.push(b'}');
    Ok(())
}

fn append_array(
    items: &[Value],
    cfg: &Config,
    depth: u32,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    out.push(b'[');
    for item in items {
        out.push(b'\n');
        tabs(out, depth);
        append_data(item, cfg, depth, true, out)?;
        out.push(b',');
    }
    out.push(b'\n');
    tabs(out, depth.saturating_sub(1));
    out.push(b']');
    Ok(())
}

fn append_data_flat(
    value: &Value,
    cfg: &Config,
    depth: u32,
    quote: bool,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match value {
        Value::Array(items) => {
            let depth = depth + 1;
            check_depth(cfg, depth)?;
            append_flattened(items, cfg, depth, true, out)
        }
        Value::Object(_) => Err(EncodeError::Unsupported {
            kind: "object",
            reason: "type not supported",
        }),
        other => append_data(other, cfg, depth, quote, out),
    }
}

/// Emits a flattened container: brace form pairing entries back into
/// `key=value` lines, or (when the sentinel leads) the bare bracket form
/// with each element force-quoted.
fn append_flattened(
    items: &[Value],
    cfg: &Config,
    depth: u32,
    leading_break: bool,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if leading_break {
        out.push(b'\n');
        tabs(out, depth.saturating_sub(1));
    }

    if !leads_with_sentinel(items) {
        out.push(b'{');
        out.push(b'\n');
        let mut i = 0;
        while i < items.len() {
            tabs(out, depth);
            append_data_flat(&items[i], cfg, depth, false, out)?;
            out.push(b'=');
            match items.get(i + 1) {
                Some(pair) => append_data_flat(pair, cfg, depth, true, out)?,
                None => out.extend_from_slice(b"null"),
            }
            out.push(b'\n');
            i += 2;
        }
        tabs(out, depth.saturating_sub(1));
        out.push(b'}');
    } else {
        out.push(b'[');
        out.push(b'\n');
        for item in &items[1..] {
            tabs(out, depth);
            out.push(b'"');
            append_data_flat(item, cfg, depth, false, out)?;
            out.push(b'"');
            out.push(b',');
            out.push(b'\n');
        }
        tabs(out, depth.saturating_sub(1));
        out.push(b']');
    }
    Ok(())
}

fn leads_with_sentinel(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::String(s)) if s.as_slice() == KV1_ARRAY_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(entries: &[(&str, Value)]) -> Value {
        let mut map = Map::default();
        for (key, value) in entries {
            map.insert(key.as_bytes().to_vec(), value.clone());
        }
        Value::Object(map)
    }

    fn encoded(value: &Value) -> String {
        let mut out = Vec::new();
        encode(value, &Config::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn encoded_array(value: &Value) -> String {
        let mut out = Vec::new();
        encode_array(value, &Config::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_top_level_pairs() {
        let tree = object(&[("key", Value::from("value")), ("num", Value::Number(42.0))]);
        assert_eq!(encoded(&tree), "key=\"value\"\nnum=42");
    }

    #[test]
    fn test_nested_object() {
        let tree = object(&[("outer", object(&[("inner", Value::from("v"))]))]);
        assert_eq!(encoded(&tree), "outer={\ninner=\"v\"\n}");
    }

    #[test]
    fn test_array_elements_trail_commas() {
        let tree = object(&[(
            "arr",
            Value::Array(vec![Value::from("a"), Value::from("b")]),
        )]);
        assert_eq!(encoded(&tree), "arr=[\n\t\"a\",\n\t\"b\",\n]");
    }

    #[test]
    fn test_empty_containers_keep_shape() {
        let tree = object(&[
            ("o", Value::Object(Map::default())),
            ("a", Value::Array(vec![])),
        ]);
        assert_eq!(encoded(&tree), "o={\n}\na=[\n]");
    }

    #[test]
    fn test_booleans_and_null() {
        let tree = object(&[
            ("t", Value::Bool(true)),
            ("f", Value::Bool(false)),
            ("n", Value::Null),
        ]);
        assert_eq!(encoded(&tree), "t=true\nf=false\nn=null");
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = object(&[("x", Value::from("v"))]);
        for _ in 0..4 {
            tree = object(&[("w", tree)]);
        }
        let mut cfg = Config::default();
        cfg.encode_max_depth = 2;
        let mut out = Vec::new();
        assert_eq!(
            encode(&tree, &cfg, &mut out).unwrap_err(),
            EncodeError::NestedTooDeep { depth: 3 }
        );
    }

    #[test]
    fn test_array_mode_pairs_without_separator() {
        let flat = Value::Array(vec![
            Value::from("k"),
            Value::from("v"),
            Value::from("k2"),
            Value::from("v2"),
        ]);
        assert_eq!(encoded_array(&flat), "\"k\"\"v\"\n\"k2\"\"v2\"");
    }

    #[test]
    fn test_array_mode_sentinel_array() {
        let flat = Value::Array(vec![
            Value::from("__IsArray__"),
            Value::from("a"),
            Value::from("b"),
        ]);
        assert_eq!(encoded_array(&flat), "[\n\t\"a\",\n\t\"b\",\n]");
    }

    #[test]
    fn test_array_mode_nested_flattened_object() {
        let flat = Value::Array(vec![
            Value::from("a"),
            Value::Array(vec![Value::from("b"), Value::from("1")]),
        ]);
        assert_eq!(encoded_array(&flat), "\"a\"\n{\n\tb=\"1\"\n}");
    }

    #[test]
    fn test_array_mode_odd_tail_pads_null() {
        let flat = Value::Array(vec![Value::from("k")]);
        assert_eq!(encoded_array(&flat), "\"k\"null");
    }
}
