//! KV3 dialect handle.

use textkv_lex::LexConfig;
use textkv_par::{reject_wide_encoding, Kv3Parser};
use textkv_util::{Config, DecodeError, EncodeError, Value};

use crate::run_encode;

/// Handle for the KV3 dialect: `key value` pairs with typed elements.
pub struct Kv3 {
    cfg: Config,
    lex: LexConfig,
    buffer: Vec<u8>,
}

impl Kv3 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            lex: LexConfig::kv3(),
            buffer: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.cfg
    }

    /// Serializes a tree.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        run_encode(&self.cfg, &mut self.buffer, |cfg, out| {
            textkv_emit::kv3::encode(value, cfg, out)
        })
    }

    /// Decodes input.
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        reject_wide_encoding(data)?;
        Kv3Parser::new(data, &self.lex, &self.cfg).parse()
    }
}

impl Default for Kv3 {
    fn default() -> Self {
        Self::new()
    }
}
