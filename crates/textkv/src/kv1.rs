//! KV1 dialect handle.

use textkv_lex::LexConfig;
use textkv_par::{reject_wide_encoding, Kv1Mode, Kv1Parser};
use textkv_util::{Config, DecodeError, EncodeError, Value};

use crate::run_encode;

/// Handle for the KV1 dialect: `key=value` pairs, `{…}`/`[…]` containers,
/// bare identifiers, `<!-- … -->` comments.
pub struct Kv1 {
    cfg: Config,
    lex: LexConfig,
    buffer: Vec<u8>,
}

impl Kv1 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            lex: LexConfig::kv1(),
            buffer: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }

    /// Serializes a tree in map form.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        run_encode(&self.cfg, &mut self.buffer, |cfg, out| {
            textkv_emit::kv1::encode(value, cfg, out)
        })
    }

    /// Serializes a flattened tree (array mode).
    pub fn encode_array(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        run_encode(&self.cfg, &mut self.buffer, |cfg, out| {
            textkv_emit::kv1::encode_array(value, cfg, out)
        })
    }

    /// Decodes input into natural objects and arrays.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        reject_wide_encoding(data)?;
        Kv1Parser::new(data, &self.lex, &self.cfg, Kv1Mode::Map).parse()
    }

    /// Decodes input into the flattened array form, tagging bare arrays
    /// with the `__IsArray__` sentinel.
    pub fn decode_array(&self, data: &[u8]) -> Result<Value, DecodeError> {
        reject_wide_encoding(data)?;
        Kv1Parser::new(data, &self.lex, &self.cfg, Kv1Mode::Array).parse_flat()
    }
}

impl Default for Kv1 {
    fn default() -> Self {
        Self::new()
    }
}
