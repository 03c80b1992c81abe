//! Tokenizer outer loop.

use crate::classify::{CommentStyle, LexConfig, TokenClass};
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Which grammar slot the parser is filling.
///
/// KV1 keys may be numeric strings, so a digit in key position starts a
/// bare string instead of a number. Everywhere else the slot makes no
/// difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Key,
    Value,
}

/// Produces one token per call, advancing past what it consumed.
///
/// The tokenizer is a pure function of the cursor position and the
/// classifier tables: calling `next_token` twice from the same position
/// yields the same kind. Error and end tokens do not advance the cursor.
///
/// # Example
///
/// ```
/// use textkv_lex::{LexConfig, Slot, Tokenizer, TokenKind};
///
/// let config = LexConfig::kv1();
/// let mut tokenizer = Tokenizer::new(b"key=42", &config, false);
///
/// assert_eq!(tokenizer.next_token(Slot::Key).kind, TokenKind::Str);
/// assert_eq!(tokenizer.scratch(), b"key");
/// assert_eq!(tokenizer.next_token(Slot::Value).kind, TokenKind::Colon);
/// assert_eq!(tokenizer.next_token(Slot::Value).kind, TokenKind::Number(42.0));
/// ```
pub struct Tokenizer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) config: &'a LexConfig,
    /// Accept Inf/NaN/hex number forms.
    pub(crate) decode_invalid_numbers: bool,
    /// Decoded payload of the most recent string token. Sized to the input
    /// once; every literal's decoded form is no longer than its source.
    pub(crate) scratch: Vec<u8>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(data: &'a [u8], config: &'a LexConfig, decode_invalid_numbers: bool) -> Self {
        Self {
            cursor: Cursor::new(data),
            config,
            decode_invalid_numbers,
            scratch: Vec::with_capacity(data.len()),
        }
    }

    /// The decoded bytes of the most recent string token. Valid only until
    /// the next `next_token` call.
    pub fn scratch(&self) -> &[u8] {
        &self.scratch
    }

    /// Copies the current string payload out for tree construction.
    pub fn take_string(&self) -> Vec<u8> {
        self.scratch.clone()
    }

    /// Current byte offset, for error reporting.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Token class of the byte under the cursor.
    pub fn class_at_cursor(&self) -> TokenClass {
        self.config.classes[self.cursor.current() as usize]
    }

    /// Advances one byte. Used by the KV0 include pre-pass, which walks
    /// the raw byte stream itself.
    pub fn bump(&mut self) {
        self.cursor.bump();
    }

    /// Skips UTF-8 BOM bytes at the current position, if present.
    pub fn skip_bom(&mut self) -> bool {
        if self.cursor.rest().starts_with(&[0xEF, 0xBB, 0xBF]) {
            self.cursor.bump_n(3);
            return true;
        }
        false
    }

    /// Scans forward until the cursor sits on a `"`. Returns false if the
    /// input ends first.
    pub fn seek_quote(&mut self) -> bool {
        while !self.cursor.is_at_end() {
            if self.cursor.current() == b'"' {
                return true;
            }
            self.cursor.bump();
        }
        false
    }

    /// With the cursor on an opening `"`, collects the raw bytes up to the
    /// closing `"` (no escape processing) and leaves the cursor on it.
    /// Returns `None` if the input ends before a closing quote.
    pub fn read_raw_quoted(&mut self) -> Option<Vec<u8>> {
        let mut raw = Vec::new();
        loop {
            self.cursor.bump();
            if self.cursor.is_at_end() {
                return None;
            }
            let ch = self.cursor.current();
            if ch == b'"' {
                return Some(raw);
            }
            raw.push(ch);
        }
    }

    /// Produces the next token.
    pub fn next_token(&mut self, slot: Slot) -> Token {
        loop {
            match self.class_at_cursor() {
                TokenClass::Whitespace => self.cursor.bump(),
                TokenClass::Comment => self.skip_line_comment(),
                _ => break,
            }
        }

        if self.config.comments == CommentStyle::Block {
            while self.cursor.current() == b'<' && self.is_block_comment_start() {
                self.skip_block_comment();
                while self.class_at_cursor() == TokenClass::Whitespace {
                    self.cursor.bump();
                }
            }
        }

        let index = self.cursor.position();
        let ch = self.cursor.current();
        let class = self.config.classes[ch as usize];

        match class {
            TokenClass::Error => return Token::error("invalid token", index),
            TokenClass::End => return Token::new(TokenKind::End, index),
            _ => {}
        }

        if self.config.bare_strings {
            if ch.is_ascii_alphabetic() {
                return self.scan_bare_string(index);
            }
            if slot == Slot::Key
                && self.config.digit_keys
                && (ch.is_ascii_digit() || ch == b'-')
            {
                return self.scan_bare_string(index);
            }
        }

        match class {
            TokenClass::ObjBegin => self.single_byte(TokenKind::ObjBegin, index),
            TokenClass::ObjEnd => self.single_byte(TokenKind::ObjEnd, index),
            TokenClass::ArrBegin => self.single_byte(TokenKind::ArrBegin, index),
            TokenClass::ArrEnd => self.single_byte(TokenKind::ArrEnd, index),
            TokenClass::Comma => self.single_byte(TokenKind::Comma, index),
            TokenClass::Colon => self.single_byte(TokenKind::Colon, index),
            TokenClass::Ref => self.single_byte(TokenKind::Ref, index),
            TokenClass::Unknown => self.scan_unknown(ch, index),
            // Whitespace/Comment/Error/End are all handled above.
            _ => Token::error("invalid token", index),
        }
    }

    fn single_byte(&mut self, kind: TokenKind, index: usize) -> Token {
        self.cursor.bump();
        Token::new(kind, index)
    }

    /// Dispatch for bytes the classifier marked as needing inspection.
    fn scan_unknown(&mut self, ch: u8, index: usize) -> Token {
        if ch == b'"' {
            return self.scan_quoted_string(index);
        }
        if ch == b'-' || ch.is_ascii_digit() {
            if !self.decode_invalid_numbers && self.is_invalid_number() {
                return Token::error("invalid number", index);
            }
            return self.scan_number(index);
        }
        if self.decode_invalid_numbers && self.is_invalid_number() {
            // Only forms the prefilter recognizes (Inf, NaN, hex) reach the
            // number parser from here, so plain bad tokens keep their own
            // error message.
            return self.scan_number(index);
        }
        Token::error("invalid token", index)
    }
}
