//! KV0 parser.
//!
//! The top level is a single `"key" value` pair; containers only use
//! `{…}`. Map form keeps every `{…}` an object. Array form (the
//! `decode2` operation) reads each container as a flat sequence of values
//! instead, so `{ "a" "1" "b" "2" }` becomes `["a","1","b","2"]`.

use textkv_lex::{LexConfig, Slot, Token, TokenKind, Tokenizer};
use textkv_util::{Config, DecodeError, Map, Value};

use crate::unexpected;

/// Recursive-descent parser for KV0 input.
pub struct Kv0Parser<'a> {
    tokens: Tokenizer<'a>,
    max_depth: u32,
    depth: u32,
}

impl<'a> Kv0Parser<'a> {
    pub fn new(data: &'a [u8], lex: &'a LexConfig, cfg: &Config) -> Self {
        Self::from_tokenizer(
            Tokenizer::new(data, lex, cfg.decode_invalid_numbers),
            cfg,
        )
    }

    /// Wraps a tokenizer that may already have consumed a BOM or include
    /// pre-pass (KV0 file mode).
    pub(crate) fn from_tokenizer(tokens: Tokenizer<'a>, cfg: &Config) -> Self {
        Self {
            tokens,
            max_depth: cfg.decode_max_depth,
            depth: 0,
        }
    }

    /// Decodes map-form input: every container is an object.
    pub fn parse(mut self) -> Result<Value, DecodeError> {
        let root = self.parse_root(false)?;
        Ok(Value::Object(root))
    }

    /// Decodes array-form input: every container is a flat value sequence.
    pub fn parse_array_form(mut self) -> Result<Value, DecodeError> {
        let root = self.parse_root(true)?;
        Ok(Value::Object(root))
    }

    /// Parses the single top-level pair into a fresh object. Empty input
    /// yields an empty object; input after the pair is ignored.
    pub(crate) fn parse_root(&mut self, array_form: bool) -> Result<Map, DecodeError> {
        let mut root = Map::default();

        let token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::End {
            return Ok(root);
        }
        let key = match token.kind {
            TokenKind::Str => self.tokens.take_string(),
            _ => return Err(unexpected("object key string", &token)),
        };

        let value_token = self.tokens.next_token(Slot::Value);
        let value = if array_form {
            self.process_value_array(value_token)?
        } else {
            self.process_value(value_token)?
        };
        root.insert(key, value);

        Ok(root)
    }

    fn process_value(&mut self, token: Token) -> Result<Value, DecodeError> {
        match token.kind {
            TokenKind::Str => Ok(Value::String(self.tokens.take_string())),
            TokenKind::ObjBegin => self.parse_object(),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Boolean(b) => Ok(Value::Bool(b)),
            TokenKind::Null => Ok(Value::Null),
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
            let key = match token.kind {
                TokenKind::Str => self.tokens.take_string(),
                _ => return Err(unexpected("object key string", &token)),
            };

            let value_token = self.tokens.next_token(Slot::Value);
            let value = self.process_value(value_token)?;
            map.insert(key, value);

            token = self.tokens.next_token(Slot::Value);
            if token.kind == TokenKind::ObjEnd {
                self.depth -= 1;
                return Ok(Value::Object(map));
            }
        }
    }

    fn process_value_array(&mut self, token: Token) -> Result<Value, DecodeError> {
        match token.kind {
            TokenKind::Str => Ok(Value::String(self.tokens.take_string())),
            TokenKind::ObjBegin => self.parse_flat_sequence(),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Boolean(b) => Ok(Value::Bool(b)),
            TokenKind::Null => Ok(Value::Null),
            _ => Err(unexpected("value", &token)),
        }
    }

    /// Array-form container body: values until `}`, in input order.
    fn parse_flat_sequence(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut items = Vec::new();

        let mut token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::ObjEnd {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.process_value_array(token)?);
            token = self.tokens.next_token(Slot::Value);
            if token.kind == TokenKind::ObjEnd {
                self.depth -= 1;
                return Ok(Value::Array(items));
            }
        }
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
