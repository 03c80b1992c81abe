//! textkv-par - Recursive-Descent Parsers
//!
//! ============================================================================
//! PARSING MODEL
//! ============================================================================
//!
//! One parser per dialect, all built the same way: pull tokens from a
//! `Tokenizer`, dispatch on the current token kind, recurse into container
//! contexts, and copy string payloads out of the scratch buffer the moment
//! a tree node is built.
//!
//! GRAMMAR SHAPES:
//! ---------------
//! ```text
//! KV0:  "key" value                      one pair; containers are {…}
//! KV1:  key[=value] …                    objects {…}, arrays […]
//! KV3:  key value …                      every object entry value that is
//!                                        a plain token gets wrapped as
//!                                        [tag, value]
//! ```
//!
//! DEPTH BOUND:
//! ------------
//! Every container entry increments a depth counter checked against
//! `decode_max_depth`; every container exit decrements it. Recursion depth
//! on the native stack is therefore bounded by configuration.
//!
//! ERROR CONVENTION:
//! -----------------
//! Structural errors render as
//! `Expected <what> but found <token> at character <n>` with a 1-based
//! offset, where `<token>` is a token-type name or, for lexical errors,
//! the scanner's message.

pub mod kv0;
pub mod kv0_file;
pub mod kv1;
pub mod kv3;

mod edge_cases;

pub use kv0::Kv0Parser;
pub use kv0_file::decode_file;
pub use kv1::{Kv1Mode, Kv1Parser};
pub use kv3::Kv3Parser;

use textkv_lex::Token;
use textkv_util::DecodeError;

/// Rejects input whose first two bytes contain a NUL, which means the
/// caller handed over UTF-16/UTF-32 text.
pub fn reject_wide_encoding(data: &[u8]) -> Result<(), DecodeError> {
    if data.len() >= 2 && (data[0] == 0 || data[1] == 0) {
        return Err(DecodeError::WideEncoding);
    }
    Ok(())
}

/// Builds the standard structural error for `token` at a grammar position
/// that wanted `expected`.
pub(crate) fn unexpected(expected: &'static str, token: &Token) -> DecodeError {
    DecodeError::Unexpected {
        expected,
        found: token.kind.describe(),
        index: token.index + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_encoding_rejection() {
        assert!(reject_wide_encoding(b"key").is_ok());
        assert!(reject_wide_encoding(b"").is_ok());
        assert!(reject_wide_encoding(b"\0").is_ok());
        assert!(matches!(
            reject_wide_encoding(b"\0k"),
            Err(DecodeError::WideEncoding)
        ));
        assert!(matches!(
            reject_wide_encoding(b"k\0"),
            Err(DecodeError::WideEncoding)
        ));
    }
}
