//! KV0 dialect handle.

use std::path::Path;

use textkv_lex::LexConfig;
use textkv_par::{decode_file, reject_wide_encoding, Kv0Parser};
use textkv_util::{Config, DecodeError, EncodeError, Value};

use crate::run_encode;

/// Handle for the KV0 dialect: `"key"<TAB>value` pairs, `{…}` containers,
/// `/` line comments, and `#` file includes in file mode.
pub struct Kv0 {
    cfg: Config,
    lex: LexConfig,
    buffer: Vec<u8>,
}

impl Kv0 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            lex: LexConfig::kv0(),
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
            textkv_emit::kv0::encode(value, cfg, out)
        })
    }

    /// Serializes a tree in array form (integer-keyed flattening).
    pub fn encode2(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        run_encode(&self.cfg, &mut self.buffer, |cfg, out| {
            textkv_emit::kv0::encode_array_form(value, cfg, out)
        })
    }

    /// Decodes map-form input.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        reject_wide_encoding(data)?;
        Kv0Parser::new(data, &self.lex, &self.cfg).parse()
    }

    /// Decodes array-form input.
    pub fn decode2(&self, data: &[u8]) -> Result<Value, DecodeError> {
        reject_wide_encoding(data)?;
        Kv0Parser::new(data, &self.lex, &self.cfg).parse_array_form()
    }

    /// Decodes a file and its `#`-includes into one outer object keyed by
    /// leaf filenames.
    pub fn decode_file_array(&self, path: impl AsRef<Path>) -> Result<Value, DecodeError> {
        decode_file(path.as_ref(), &self.lex, &self.cfg)
    }
}

impl Default for Kv0 {
    fn default() -> Self {
        Self::new()
    }
}
