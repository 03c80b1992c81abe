//! KV3 parser.
//!
//! The top level is a sequence of `key value` pairs with no separator.
//! An object entry whose value starts with a plain string is a typed
//! entry: the string is a type tag and the following value is the real
//! payload, captured together as `[tag, value]`. Array elements may carry
//! the same leading tag, detected by lookahead: if the token after an
//! element is neither `,` nor `]`, the element just read was actually a
//! tag for the value that follows.

use textkv_lex::{LexConfig, Slot, Token, TokenKind, Tokenizer};
use textkv_util::{float, Config, DecodeError, Map, Value};

use crate::unexpected;

/// Recursive-descent parser for KV3 input.
pub struct Kv3Parser<'a> {
    tokens: Tokenizer<'a>,
    max_depth: u32,
    depth: u32,
}

impl<'a> Kv3Parser<'a> {
    pub fn new(data: &'a [u8], lex: &'a LexConfig, cfg: &Config) -> Self {
        Self {
            tokens: Tokenizer::new(data, lex, cfg.decode_invalid_numbers),
            max_depth: cfg.decode_max_depth,
            depth: 0,
        }
    }

    /// Decodes a top-level document: `key value` pairs until END.
    pub fn parse(mut self) -> Result<Value, DecodeError> {
        let mut root = Map::default();

        let mut token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::End {
            return Ok(Value::Object(root));
        }
        if token.kind != TokenKind::Str {
            return Err(unexpected("Must begin with string", &token));
        }

        loop {
            let key = self.tokens.take_string();
            let value = self.parse_entry_value()?;
            root.insert(key, value);

            token = self.tokens.next_token(Slot::Value);
            if token.kind == TokenKind::End {
                return Ok(Value::Object(root));
            }
            if token.kind != TokenKind::Str {
                return Err(unexpected("object key string", &token));
            }
        }
    }

    /// The value of an object entry. A plain string means "type tag":
    /// the tag and the value after it wrap into a two-entry array.
    fn parse_entry_value(&mut self) -> Result<Value, DecodeError> {
        let token = self.tokens.next_token(Slot::Value);
        match token.kind {
            TokenKind::Str => {
                let tag = self.tokens.take_string();
                let value_token = self.tokens.next_token(Slot::Value);
                let value = self.process_value(value_token)?;
                Ok(Value::Array(vec![Value::String(tag), value]))
            }
            TokenKind::ObjBegin | TokenKind::ArrBegin => self.process_value(token),
            _ => Err(unexpected("unexpected token", &token)),
        }
    }

    fn process_value(&mut self, token: Token) -> Result<Value, DecodeError> {
        match token.kind {
            TokenKind::Str => Ok(Value::String(self.tokens.take_string())),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::ObjBegin => self.parse_object(),
            TokenKind::ArrBegin => self.parse_array(),
            _ => Err(unexpected("value", &token)),
        }
    }

    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut map = Map::default();

        let mut token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::ObjEnd {
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        loop {
            if token.kind != TokenKind::Str {
                return Err(unexpected("object key string", &token));
            }
            let key = self.tokens.take_string();
            let value = self.parse_entry_value()?;
            map.insert(key, value);

            token = self.tokens.next_token(Slot::Value);
            if token.kind == TokenKind::ObjEnd {
                self.depth -= 1;
                return Ok(Value::Object(map));
            }
        }
    }

    /// Array body with typed-element lookahead and trailing-comma
    /// tolerance.
    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut items = Vec::new();

        let mut token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::ArrEnd {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            let value = self.process_value(token)?;

            let next = self.tokens.next_token(Slot::Value);
            match next.kind {
                TokenKind::Comma => {
                    items.push(value);
                    let after = self.tokens.next_token(Slot::Value);
                    if after.kind == TokenKind::ArrEnd {
                        break;
                    }
                    token = after;
                }
                TokenKind::ArrEnd => {
                    items.push(value);
                    break;
                }
                _ => {
                    // Typed element: `value` was the tag, `next` starts
                    // the element itself.
                    let tag = match value {
                        Value::String(bytes) => bytes,
                        Value::Number(n) => float::format_g(n, 14).into_bytes(),
                        _ => return Err(unexpected("value", &next)),
                    };
                    let element = self.process_value(next)?;
                    items.push(Value::Array(vec![Value::String(tag), element]));

                    let after = self.tokens.next_token(Slot::Value);
                    match after.kind {
                        TokenKind::Comma => {
                            let resumed = self.tokens.next_token(Slot::Value);
                            if resumed.kind == TokenKind::ArrEnd {
                                self.depth -= 1;
                                return Ok(Value::Array(items));
                            }
                            token = resumed;
                        }
                        TokenKind::ArrEnd => {
                            self.depth -= 1;
                            return Ok(Value::Array(items));
                        }
                        _ => token = after,
                    }
                }
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn descend(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(DecodeError::NestedTooDeep {
                depth: self.depth,
                index: self.tokens.position() + 1,
            });
        }
        Ok(())
    }
}
