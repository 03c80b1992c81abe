//! textkv-util - Foundation Types for the KeyValues Toolchain
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the fundamental types shared by every other crate in
//! the workspace: the in-memory value tree produced by the decoders and
//! consumed by the encoders, the per-dialect configuration block, the error
//! enums surfaced to callers, and the number/text conversion primitives.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. ONE TREE, THREE DIALECTS
//!    KV0, KV1, and KV3 all decode into the same `Value` union. Dialect
//!    differences live entirely in the tokenizers, parsers, and emitters.
//!
//! 2. ORDER PRESERVATION
//!    Object containers remember insertion order. Re-encoding a decoded
//!    tree must walk keys in the order the input supplied them, so the
//!    object container is an `IndexMap`, not a plain hash map.
//!
//! 3. BYTES, NOT STRINGS
//!    Decoded string payloads are byte sequences. Escape decoding emits
//!    UTF-8, but nothing re-validates input bytes, so `Vec<u8>` is the
//!    honest payload type.
//!
//! 4. ERRORS ARE VALUES
//!    Every fallible operation returns `Result` with a `thiserror` enum
//!    whose `Display` form is the exact message callers match on.

mod config;
mod error;
pub mod float;
mod value;

pub use config::{Config, InvalidNumberMode};
pub use error::{ConfigError, DecodeError, EncodeError};
pub use value::{Map, Value};

/// Sentinel string the KV1 array mode prepends to a flattened bare array,
/// so the emitter can tell array-shaped input from object-shaped input.
pub const KV1_ARRAY_SENTINEL: &[u8] = b"__IsArray__";
