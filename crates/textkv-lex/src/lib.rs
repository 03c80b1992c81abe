//! textkv-lex - Tokenizers for the KeyValues Dialects
//!
//! ============================================================================
//! TOKENIZATION MODEL
//! ============================================================================
//!
//! All three dialects share one tokenizer skeleton driven by a 256-entry
//! classifier table:
//!
//! ```text
//!   byte ──► TokenClass ──► outer loop action
//!            Whitespace     skip
//!            Comment        skip to end of line (KV0)
//!            ObjBegin, …    single-byte token
//!            Unknown        dispatch on the byte itself:
//!                           '"'    quoted string scan
//!                           0-9 -  number scan
//!                           a-zA-Z bare string scan (KV1/KV3)
//!            Error          error token, cursor not advanced
//!            End            end token, cursor not advanced
//! ```
//!
//! The classifier differs per dialect (KV0 has no brackets and treats `#`
//! as a file reference; KV1/KV3 add brackets, `=`, and bare identifiers),
//! but the loop above never changes.
//!
//! END SENTINEL:
//! -------------
//! The byte cursor yields 0 past the end of input, and every classifier
//! maps byte 0 to `End`. An embedded NUL therefore terminates scanning the
//! same way real end-of-input does, which is exactly the contract the
//! parsers rely on.
//!
//! SCRATCH BUFFER:
//! ---------------
//! String tokens do not carry their payload. The decoded bytes of the most
//! recent string token live in the tokenizer's scratch buffer and are valid
//! only until the next `next_token` call; parsers copy them out when they
//! build tree nodes. The buffer is sized to the input up front, which is
//! always enough because every escape form decodes to fewer bytes than it
//! occupies in the input.

pub mod classify;
pub mod cursor;
pub mod token;
pub mod tokenizer;
mod unicode;

mod edge_cases;

pub use classify::{CommentStyle, LexConfig, StringStyle, TokenClass};
pub use token::{Token, TokenKind};
pub use tokenizer::{Slot, Tokenizer};
