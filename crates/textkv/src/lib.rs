//! textkv - Decode and Encode the KeyValues Text Dialects
//!
//! Three related text formats share this toolchain: KV0 (tab-separated
//! pairs with `{…}` containers and `#` file includes), KV1 (`key=value`
//! pairs with `{…}`/`[…]` containers and bare identifiers), and KV3
//! (`key value` pairs where values may carry type tags).
//!
//! Each dialect gets a handle owning its configuration and, when buffer
//! reuse is enabled, a persistent encode buffer. Handles are cheap to
//! create and not meant to be shared across threads mid-call; make one
//! per worker.
//!
//! # Example
//!
//! ```
//! use textkv::{Kv1, Value};
//!
//! let kv1 = Kv1::new();
//! let tree = kv1.decode(b"key=value\nnum=42\n").unwrap();
//! assert_eq!(tree.get("key").and_then(Value::as_str), Some("value"));
//! assert_eq!(tree.get("num").and_then(Value::as_number), Some(42.0));
//! ```

mod kv0;
mod kv1;
mod kv3;

pub use kv0::Kv0;
pub use kv1::Kv1;
pub use kv3::Kv3;

pub use textkv_util::{
    Config, ConfigError, DecodeError, EncodeError, InvalidNumberMode, Map, Value,
    KV1_ARRAY_SENTINEL,
};

/// Shared encode-buffer discipline: with `encode_keep_buffer` set the
/// handle's buffer is reused (and its capacity retained even when the
/// emitter fails partway), otherwise each call works in a fresh one.
pub(crate) fn run_encode(
    cfg: &Config,
    buffer: &mut Vec<u8>,
    emit: impl FnOnce(&Config, &mut Vec<u8>) -> Result<(), EncodeError>,
) -> Result<Vec<u8>, EncodeError> {
    if cfg.encode_keep_buffer {
        buffer.clear();
        emit(cfg, buffer)?;
        Ok(buffer.clone())
    } else {
        let mut out = Vec::new();
        emit(cfg, &mut out)?;
        Ok(out)
    }
}
