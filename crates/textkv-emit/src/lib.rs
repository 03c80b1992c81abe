//! textkv-emit - Serializers for the KeyValues Dialects
//!
//! Each dialect has one emitter module turning a `Value` tree back into
//! bytes. The emitters share string escaping and number formatting
//! (`escape`), enforce `encode_max_depth` with the same counter discipline
//! the parsers use, and emit LF line endings with hard-tab indentation.
//!
//! Output is appended to a caller-supplied `Vec<u8>`, which is how the
//! persistent-buffer option works: the dialect handle keeps the vector
//! alive between calls and the emitters only ever append.

mod escape;
pub mod kv0;
pub mod kv1;
pub mod kv3;

use textkv_util::{Config, EncodeError};

/// Depth guard shared by every container-emitting path.
pub(crate) fn check_depth(cfg: &Config, depth: u32) -> Result<(), EncodeError> {
    if depth > cfg.encode_max_depth {
        return Err(EncodeError::NestedTooDeep { depth });
    }
    Ok(())
}

/// Appends `count` hard tabs.
pub(crate) fn tabs(out: &mut Vec<u8>, count: u32) {
    for _ in 0..count {
        out.push(b'\t');
    }
}
