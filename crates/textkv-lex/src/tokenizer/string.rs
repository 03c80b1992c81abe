//! String literal scanning.
//!
//! Two quoted styles exist. KV0 decodes escapes through the escape table
//! and expands `\uXXXX` sequences to UTF-8. KV1/KV3 decode nothing: any
//! run of consecutive backslashes collapses to a single `/` emitted before
//! the following byte, a dialect quirk that must be preserved bit-for-bit.
//! KV1/KV3 additionally accept bare (unquoted) strings.

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::unicode;
use crate::StringStyle;

impl<'a> Tokenizer<'a> {
    /// Scans a quoted string literal. The cursor must be on the opening
    /// quote. The decoded payload lands in the scratch buffer.
    pub(crate) fn scan_quoted_string(&mut self, index: usize) -> Token {
        match self.config.strings {
            StringStyle::Escaped => self.scan_escaped_quoted(index),
            StringStyle::Collapsed => self.scan_collapsed_quoted(index),
        }
    }

    /// KV0 quoted string: escape table plus unicode escapes.
    fn scan_escaped_quoted(&mut self, index: usize) -> Token {
        self.cursor.bump();
        self.scratch.clear();

        loop {
            let ch = self.cursor.current();
            if ch == b'"' {
                self.cursor.bump();
                break;
            }
            if ch == 0 {
                return Token::error("unexpected end of string", self.cursor.position());
            }
            if ch == b'\\' {
                let escape = self.cursor.peek(1);
                let mapped = self.config.escapes[escape as usize];
                if mapped == b'u' {
                    match unicode::decode_escape(self.cursor.rest()) {
                        Some((utf8, len, consumed)) => {
                            self.scratch.extend_from_slice(&utf8[..len]);
                            self.cursor.bump_n(consumed);
                            continue;
                        }
                        None => {
                            return Token::error(
                                "invalid unicode escape code",
                                self.cursor.position(),
                            );
                        }
                    }
                }
                if mapped == 0 {
                    return Token::error("invalid escape code", self.cursor.position());
                }
                self.cursor.bump();
                self.scratch.push(mapped);
                self.cursor.bump();
                continue;
            }
            self.scratch.push(ch);
            self.cursor.bump();
        }

        Token::new(TokenKind::Str, index)
    }

    /// KV1/KV3 quoted string: backslash runs collapse to `/`.
    fn scan_collapsed_quoted(&mut self, index: usize) -> Token {
        self.cursor.bump();
        self.scratch.clear();

        loop {
            let mut ch = self.cursor.current();
            if ch == b'"' {
                self.cursor.bump();
                break;
            }
            if ch == 0 {
                return Token::error("unexpected end of string", self.cursor.position());
            }
            let mut saw_backslash = false;
            while ch == b'\\' {
                self.cursor.bump();
                ch = self.cursor.current();
                saw_backslash = true;
            }
            if saw_backslash {
                self.scratch.push(b'/');
                if ch == 0 {
                    return Token::error("unexpected end of string", self.cursor.position());
                }
            }
            self.scratch.push(ch);
            self.cursor.bump();
        }

        Token::new(TokenKind::Str, index)
    }

    /// Bare string: everything up to whitespace or `=`. The terminator is
    /// left unconsumed. An escaped (backslash-preceded) terminator byte is
    /// consumed into the string.
    pub(crate) fn scan_bare_string(&mut self, index: usize) -> Token {
        self.scratch.clear();

        loop {
            let mut ch = self.cursor.current();
            if matches!(ch, b' ' | b'\t' | b'\r' | b'\n' | b'=') {
                break;
            }
            if ch == 0 {
                return Token::error("unexpected end of string", self.cursor.position());
            }
            let mut saw_backslash = false;
            while ch == b'\\' {
                self.cursor.bump();
                ch = self.cursor.current();
                saw_backslash = true;
            }
            if saw_backslash {
                self.scratch.push(b'/');
                if ch == 0 {
                    return Token::error("unexpected end of string", self.cursor.position());
                }
            }
            self.scratch.push(ch);
            self.cursor.bump();
        }

        Token::new(TokenKind::Str, index)
    }
}
