//! KV1 parser.
//!
//! The top level is a sequence of `key[=value]` pairs; objects use `{…}`
//! and arrays `[…]`. Keys and simple values may be bare identifiers.
//!
//! Two client modes exist. Map mode builds ordinary objects and arrays.
//! Array mode flattens every mapping into an alternating key/value
//! sequence, tagging bare arrays with a leading `__IsArray__` sentinel so
//! the emitter can tell the two shapes apart later. The mode is a field of
//! the parser, never shared state.
//!
//! Containers tolerate an embedded KV3-style header (`{` name … `}` inside
//! the container): the wrapper brace and name are skipped and the matching
//! extra `}` is consumed after the container's own close.

use textkv_lex::{LexConfig, Slot, Token, TokenKind, Tokenizer};
use textkv_util::{Config, DecodeError, Map, Value, KV1_ARRAY_SENTINEL};

use crate::unexpected;

/// Container flattening behavior, threaded through the whole parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kv1Mode {
    /// Natural objects and arrays.
    Map,
    /// Alternating key/value arrays with the `__IsArray__` tag.
    Array,
}

/// Recursive-descent parser for KV1 input.
pub struct Kv1Parser<'a> {
    tokens: Tokenizer<'a>,
    max_depth: u32,
    depth: u32,
    mode: Kv1Mode,
}

impl<'a> Kv1Parser<'a> {
    pub fn new(data: &'a [u8], lex: &'a LexConfig, cfg: &Config, mode: Kv1Mode) -> Self {
        Self {
            tokens: Tokenizer::new(data, lex, cfg.decode_invalid_numbers),
            max_depth: cfg.decode_max_depth,
            depth: 0,
            mode,
        }
    }

    /// Decodes a top-level document for map mode: a pair sequence, or a
    /// single braced object. Anything else yields an empty object.
    pub fn parse(mut self) -> Result<Value, DecodeError> {
        let token = self.tokens.next_token(Slot::Key);
        match token.kind {
            TokenKind::Str => {
                let mut root = Map::default();
                let mut token = token;
                loop {
                    let key = match token.kind {
                        TokenKind::Str => self.tokens.take_string(),
                        _ => return Err(unexpected("object key string", &token)),
                    };
                    let value = self.parse_pair_value()?;
                    root.insert(key, value);

                    token = self.tokens.next_token(Slot::Key);
                    if token.kind == TokenKind::End {
                        return Ok(Value::Object(root));
                    }
                }
            }
            TokenKind::ObjBegin => {
                let value = self.process_value(token)?;
                let end = self.tokens.next_token(Slot::Value);
                if end.kind != TokenKind::End {
                    return Err(unexpected("the end", &end));
                }
                Ok(value)
            }
            _ => Ok(Value::Object(Map::default())),
        }
    }

    /// Decodes a top-level document for array mode: a container input
    /// returns its flattened form directly, anything else is read as a
    /// flat alternating sequence until END.
    pub fn parse_flat(mut self) -> Result<Value, DecodeError> {
        let token = self.tokens.next_token(Slot::Key);
        match token.kind {
            TokenKind::ObjBegin | TokenKind::ArrBegin => {
                let value = self.process_value(token)?;
                let end = self.tokens.next_token(Slot::Value);
                if end.kind != TokenKind::End {
                    return Err(unexpected("the end", &end));
                }
                Ok(value)
            }
            TokenKind::End => Ok(Value::Array(Vec::new())),
            _ => {
                let mut items = Vec::new();
                let mut token = token;
                loop {
                    items.push(self.process_value(token)?);

                    let separator = self.tokens.next_token(Slot::Value);
                    if separator.kind == TokenKind::Colon {
                        let value_token = self.tokens.next_token(Slot::Value);
                        items.push(self.process_value(value_token)?);
                    } else {
                        // Pairs may ride with no separator at all.
                        items.push(self.process_value(separator)?);
                    }

                    token = self.tokens.next_token(Slot::Key);
                    if token.kind == TokenKind::End {
                        return Ok(Value::Array(items));
                    }
                }
            }
        }
    }

    /// Reads `[=]value` after a key. The `=` is optional for compat.
    fn parse_pair_value(&mut self) -> Result<Value, DecodeError> {
        let token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::Colon {
            let value_token = self.tokens.next_token(Slot::Value);
            self.process_value(value_token)
        } else {
            self.process_value(token)
        }
    }

    fn process_value(&mut self, token: Token) -> Result<Value, DecodeError> {
        match token.kind {
            TokenKind::Str => Ok(Value::String(self.tokens.take_string())),
            TokenKind::Number(n) => Ok(Value::Number(n)),
            TokenKind::Boolean(b) => Ok(Value::Bool(b)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::ObjBegin => match self.mode {
                Kv1Mode::Map => self.parse_object(),
                Kv1Mode::Array => self.parse_flat_container(true),
            },
            TokenKind::ArrBegin => match self.mode {
                Kv1Mode::Map => self.parse_array(),
                Kv1Mode::Array => self.parse_flat_container(false),
            },
            _ => Err(unexpected("value", &token)),
        }
    }

    /// Map-mode object body.
    fn parse_object(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut map = Map::default();

        let mut token = self.tokens.next_token(Slot::Key);
        if token.kind == TokenKind::ObjEnd {
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        let mut extra_close = false;
        if token.kind == TokenKind::ObjBegin {
            // Embedded KV3 header: skip the wrapper and its name.
            let _header = self.tokens.next_token(Slot::Key);
            token = self.tokens.next_token(Slot::Key);
            extra_close = true;
        }

        loop {
            let key = match token.kind {
                TokenKind::Str => self.tokens.take_string(),
                _ => return Err(unexpected("object key string", &token)),
            };
            let value = self.parse_pair_value()?;
            map.insert(key, value);

            token = self.tokens.next_token(Slot::Key);
            if token.kind == TokenKind::ObjEnd {
                if extra_close {
                    let _ = self.tokens.next_token(Slot::Key);
                }
                self.depth -= 1;
                return Ok(Value::Object(map));
            }
        }
    }

    /// Map-mode array body: comma-separated values, trailing comma
    /// accepted.
    fn parse_array(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut items = Vec::new();

        let mut token = self.tokens.next_token(Slot::Value);
        if token.kind == TokenKind::ArrEnd {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        if token.kind == TokenKind::ObjBegin {
            // Embedded KV3 header. The extra close is not consumed in
            // array context.
            let _header = self.tokens.next_token(Slot::Key);
            token = self.tokens.next_token(Slot::Key);
        }

        loop {
            items.push(self.process_value(token)?);

            let separator = self.tokens.next_token(Slot::Value);
            if separator.kind == TokenKind::ArrEnd {
                break;
            }
            let next = self.tokens.next_token(Slot::Value);
            if next.kind == TokenKind::ArrEnd {
                break;
            }
            token = next;
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    /// Array-mode container body: every entry flattens into one
    /// alternating sequence. Bare arrays get the sentinel prepended;
    /// object-shaped input does not. A `=` inside a bare array inserts a
    /// synthetic numeric key to keep the alternation intact.
    fn parse_flat_container(&mut self, is_object: bool) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut items = Vec::new();

        let first_slot = if is_object { Slot::Key } else { Slot::Value };
        let mut token = self.tokens.next_token(first_slot);
        if token.kind == TokenKind::ArrEnd
            || (is_object && token.kind == TokenKind::ObjEnd)
        {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        let mut extra_close = false;
        if token.kind == TokenKind::ObjBegin {
            let _header = self.tokens.next_token(Slot::Key);
            token = self.tokens.next_token(Slot::Key);
            extra_close = true;
        }

        if !is_object {
            items.push(Value::String(KV1_ARRAY_SENTINEL.to_vec()));
        }

        let mut synthetic_key = 1i64;
        loop {
            items.push(self.process_value(token)?);

            let mut next = self.tokens.next_token(Slot::Value);
            if next.kind == TokenKind::Comma {
                next = self.tokens.next_token(Slot::Key);
            }
            if next.kind == TokenKind::Colon {
                if !is_object {
                    items.push(Value::Number(synthetic_key as f64));
                    synthetic_key += 1;
                }
                let value_token = self.tokens.next_token(Slot::Value);
                items.push(self.process_value(value_token)?);
                next = self.tokens.next_token(Slot::Key);
            }

            if next.kind == TokenKind::ArrEnd
                || (is_object && next.kind == TokenKind::ObjEnd)
            {
                if extra_close {
                    let _ = self.tokens.next_token(Slot::Key);
                }
                self.depth -= 1;
                return Ok(Value::Array(items));
            }
            token = next;
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

#[cfg(test)]
mod tests {
    use super::*;
    use textkv_lex::LexConfig;

    fn decode(input: &[u8]) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv1();
        Kv1Parser::new(input, &lex, &Config::default(), Kv1Mode::Map).parse()
    }

    fn decode_array(input: &[u8]) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv1();
        Kv1Parser::new(input, &lex, &Config::default(), Kv1Mode::Array).parse_flat()
    }

    fn strings(items: &[&str]) -> Value {
        Value::Array(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn test_unquoted_pairs() {
        let root = decode(b"key=value\nnum=42\n").unwrap();
        assert_eq!(root.get("key"), Some(&Value::from("value")));
        assert_eq!(root.get("num"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_quoted_pairs() {
        let root = decode(b"\"key\"=\"a value\"\n").unwrap();
        assert_eq!(root.get("key"), Some(&Value::from("a value")));
    }

    #[test]
    fn test_missing_equals_tolerated() {
        let root = decode(b"key \"value\"\n").unwrap();
        assert_eq!(root.get("key"), Some(&Value::from("value")));
    }

    #[test]
    fn test_numeric_keys_are_strings() {
        let root = decode(b"42=\"x\"\n").unwrap();
        assert_eq!(root.get("42"), Some(&Value::from("x")));
    }

    #[test]
    fn test_nested_object() {
        let root = decode(b"outer={\ninner=\"v\"\n}\n").unwrap();
        assert_eq!(
            root.get("outer").and_then(|v| v.get("inner")),
            Some(&Value::from("v"))
        );
    }

    #[test]
    fn test_array_with_trailing_comma() {
        let root = decode(b"arr=[ \"a\", \"b\", \"c\", ]\n").unwrap();
        assert_eq!(root.get("arr"), Some(&strings(&["a", "b", "c"])));
    }

    #[test]
    fn test_array_without_trailing_comma() {
        let root = decode(b"arr=[ \"a\", \"b\" ]\n").unwrap();
        assert_eq!(root.get("arr"), Some(&strings(&["a", "b"])));
    }

    #[test]
    fn test_empty_containers() {
        let root = decode(b"o={}\na=[]\n").unwrap();
        assert_eq!(root.get("o"), Some(&Value::Object(Map::default())));
        assert_eq!(root.get("a"), Some(&Value::Array(vec![])));
    }

    #[test]
    fn test_block_comments_ignored() {
        let root = decode(b"<!-- head -->key=value\n<!-- tail -->num=1\n").unwrap();
        assert_eq!(root.get("key"), Some(&Value::from("value")));
        assert_eq!(root.get("num"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_top_level_braced_object() {
        let root = decode(b"{\na=\"1\"\n}").unwrap();
        assert_eq!(root.get("a"), Some(&Value::from("1")));
    }

    #[test]
    fn test_top_level_braced_object_with_trailing_junk() {
        let err = decode(b"{\na=\"1\"\n} x=\"2\"").unwrap_err();
        assert!(err.to_string().starts_with("Expected the end but found"));
    }

    #[test]
    fn test_nested_kv3_header_skipped() {
        // `{ { name …body… } }` parses as the body object.
        let root = decode(b"outer={ { header k=\"v\"\n} }\n").unwrap();
        assert_eq!(
            root.get("outer").and_then(|v| v.get("k")),
            Some(&Value::from("v"))
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut cfg = Config::default();
        cfg.decode_max_depth = 2;
        let lex = LexConfig::kv1();
        let input = b"a={\nb={\nc={\n}\n}\n}\n";
        let err = Kv1Parser::new(input, &lex, &cfg, Kv1Mode::Map)
            .parse()
            .unwrap_err();
        assert!(matches!(err, DecodeError::NestedTooDeep { depth: 3, .. }));
    }

    #[test]
    fn test_backslashes_collapse() {
        let root = decode(b"path=\"a\\\\b\\nc\"\n").unwrap();
        // Each backslash run collapses to '/': a\\b -> a/b, \n -> /n.
        assert_eq!(root.get("path"), Some(&Value::from("a/b/nc")));
    }

    #[test]
    fn test_array_mode_bare_array_gets_sentinel() {
        let flat = decode_array(b"[ \"a\", \"b\" ]").unwrap();
        assert_eq!(flat, strings(&["__IsArray__", "a", "b"]));
    }

    #[test]
    fn test_array_mode_object_flattens() {
        let flat = decode_array(b"{ a=\"1\"\nb=\"2\"\n}").unwrap();
        assert_eq!(flat, strings(&["a", "1", "b", "2"]));
    }

    #[test]
    fn test_array_mode_top_level_pairs() {
        let flat = decode_array(b"\"k\"=\"v\"\n\"k2\"=\"v2\"\n").unwrap();
        assert_eq!(flat, strings(&["k", "v", "k2", "v2"]));
    }

    #[test]
    fn test_array_mode_pairs_without_separator() {
        let flat = decode_array(b"\"k\"\"v\"\n").unwrap();
        assert_eq!(flat, strings(&["k", "v"]));
    }

    #[test]
    fn test_array_mode_nested_object_value() {
        let flat = decode_array(b"\"a\"={ b=\"1\"\n}\n").unwrap();
        assert_eq!(
            flat,
            Value::Array(vec![
                Value::from("a"),
                strings(&["b", "1"]),
            ])
        );
    }

    #[test]
    fn test_array_mode_equals_inside_bare_array() {
        // An '=' inside a bare array inserts a synthetic numeric key.
        let flat = decode_array(b"[ \"a\" = \"b\" ]").unwrap();
        assert_eq!(
            flat,
            Value::Array(vec![
                Value::from("__IsArray__"),
                Value::from("a"),
                Value::Number(1.0),
                Value::from("b"),
            ])
        );
    }

    #[test]
    fn test_array_mode_empty_input() {
        assert_eq!(decode_array(b"").unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_unknown_top_level_yields_empty_object() {
        let root = decode(b"[ \"a\" ]").unwrap();
        assert_eq!(root, Value::Object(Map::default()));
    }
}
