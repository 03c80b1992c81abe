//! String and number emission shared by the dialect emitters.

use textkv_util::{float, Config, EncodeError, InvalidNumberMode};

/// Appends `bytes` with the escape set applied but no surrounding quotes
/// (KV1 keys are written bare).
pub(crate) fn append_escaped(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            b'\t' => out.extend_from_slice(b"\\t"),
            b'\n' => out.extend_from_slice(b"\\n"),
            0x0C => out.extend_from_slice(b"\\f"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x00..=0x1F | 0x7F => {
                out.extend_from_slice(format!("\\u{:04x}", b).as_bytes());
            }
            _ => out.push(b),
        }
    }
}

/// Appends `bytes` as a quoted, escaped string literal.
pub(crate) fn append_quoted(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'"');
    append_escaped(out, bytes);
    out.push(b'"');
}

/// Appends a number under the configured NaN/Infinity policy and
/// precision.
pub(crate) fn append_number(
    out: &mut Vec<u8>,
    cfg: &Config,
    value: f64,
) -> Result<(), EncodeError> {
    if value.is_nan() || value.is_infinite() {
        match cfg.encode_invalid_numbers {
            InvalidNumberMode::Off => {
                return Err(EncodeError::Unsupported {
                    kind: "number",
                    reason: "must not be NaN or Infinity",
                });
            }
            InvalidNumberMode::On => {
                if value.is_nan() {
                    out.extend_from_slice(b"NaN");
                } else if value < 0.0 {
                    out.extend_from_slice(b"-Infinity");
                } else {
                    out.extend_from_slice(b"Infinity");
                }
                return Ok(());
            }
            InvalidNumberMode::Null => {
                out.extend_from_slice(b"null");
                return Ok(());
            }
        }
    }

    out.extend_from_slice(float::format_g(value, cfg.encode_number_precision).as_bytes());
    Ok(())
}
