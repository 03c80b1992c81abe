//! Error types surfaced by decode, encode, and configuration.
//!
//! The `Display` strings are the stable surface callers match on; keep the
//! `Expected …`, `Found too many …`, and `Cannot serialise …` prefixes
//! intact.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding input bytes into a value tree.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The grammar wanted one thing and the tokenizer produced another.
    /// `found` is either a token-type name (`T_STRING`, `T_OBJ_END`, …) or
    /// a lexical error message; `index` is 1-based.
    #[error("Expected {expected} but found {found} at character {index}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
        index: usize,
    },

    /// Container nesting exceeded `decode_max_depth`.
    #[error("Found too many nested data structures ({depth}) at character {index}")]
    NestedTooDeep { depth: u32, index: usize },

    /// A NUL in the first two bytes means UTF-16/UTF-32 input.
    #[error("KV parser does not support UTF-16 or UTF-32")]
    WideEncoding,

    /// File input without a BOM whose first byte is not in the dialect's
    /// vocabulary.
    #[error("KV parser only supports UTF-8")]
    NotUtf8,

    /// Failure reading an included file (KV0 file mode only).
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while serialising a value tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The value has no representation in the target dialect.
    #[error("Cannot serialise {kind}: {reason}")]
    Unsupported {
        kind: &'static str,
        reason: &'static str,
    },

    /// Container nesting exceeded `encode_max_depth`.
    #[error("Cannot serialise, excessive nesting ({depth})")]
    NestedTooDeep { depth: u32 },
}

/// A configuration option was set outside its allowed range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected integer between {min} and {max}")]
pub struct ConfigError {
    pub min: i64,
    pub max: i64,
}
