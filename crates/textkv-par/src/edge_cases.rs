//! Edge case tests for textkv-par

#[cfg(test)]
mod tests {
    use textkv_lex::LexConfig;
    use textkv_util::{Config, DecodeError, Value};

    use crate::{Kv0Parser, Kv1Mode, Kv1Parser, Kv3Parser};

    fn kv0(input: &[u8]) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv0();
        Kv0Parser::new(input, &lex, &Config::default()).parse()
    }

    fn kv1(input: &[u8]) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv1();
        Kv1Parser::new(input, &lex, &Config::default(), Kv1Mode::Map).parse()
    }

    fn kv3(input: &[u8]) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv3();
        Kv3Parser::new(input, &lex, &Config::default()).parse()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_truncated_object() {
        let err = kv0(b"\"k\"\t{ \"a\"\t\"1\"").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Expected object key string but found T_END"));
    }

    #[test]
    fn test_edge_truncated_string() {
        let err = kv0(b"\"k\"\t\"unclosed").unwrap_err();
        assert!(err.to_string().contains("unexpected end of string"));
    }

    #[test]
    fn test_edge_error_offsets_are_one_based() {
        let err = kv0(b"^").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected object key string but found invalid token at character 1"
        );
    }

    #[test]
    fn test_edge_deeply_nested_at_exact_limit() {
        let mut cfg = Config::default();
        cfg.decode_max_depth = 64;
        let lex = LexConfig::kv1();

        let mut input = b"a=".to_vec();
        for _ in 0..64 {
            input.extend_from_slice(b"{\nx=");
        }
        input.extend_from_slice(b"\"v\"");
        for _ in 0..64 {
            input.extend_from_slice(b"\n}");
        }
        input.push(b'\n');

        assert!(Kv1Parser::new(&input, &lex, &cfg, Kv1Mode::Map)
            .parse()
            .is_ok());

        cfg.decode_max_depth = 63;
        assert!(matches!(
            Kv1Parser::new(&input, &lex, &cfg, Kv1Mode::Map).parse(),
            Err(DecodeError::NestedTooDeep { depth: 64, .. })
        ));
    }

    #[test]
    fn test_edge_kv1_deep_array_nesting() {
        let mut cfg = Config::default();
        cfg.decode_max_depth = 8;
        let lex = LexConfig::kv1();
        let input = b"a=[[[[[[[[[ \"x\" ]]]]]]]]]\n";
        assert!(matches!(
            Kv1Parser::new(input, &lex, &cfg, Kv1Mode::Map).parse(),
            Err(DecodeError::NestedTooDeep { depth: 9, .. })
        ));
    }

    #[test]
    fn test_edge_utf16_rejection_applies_before_parse() {
        assert!(matches!(
            crate::reject_wide_encoding(&[0xFF, 0x00, 0x41]),
            Err(DecodeError::WideEncoding)
        ));
    }

    #[test]
    fn test_edge_kv0_ref_token_outside_file_mode() {
        let err = kv0(b"\"k\"\t#").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected value but found T_REF at character 5"
        );
    }

    #[test]
    fn test_edge_kv1_numbers_keep_precision() {
        let root = kv1(b"v=0.25\n").unwrap();
        assert_eq!(root.get("v"), Some(&Value::Number(0.25)));
    }

    #[test]
    fn test_edge_kv1_lenient_numbers_off_by_config() {
        let mut cfg = Config::default();
        cfg.decode_invalid_numbers = false;
        let lex = LexConfig::kv1();
        let err = Kv1Parser::new(b"v=0x10\n", &lex, &cfg, Kv1Mode::Map)
            .parse()
            .unwrap_err();
        assert!(err.to_string().contains("invalid number"));
    }

    #[test]
    fn test_edge_kv1_lenient_numbers_on_by_default() {
        let root = kv1(b"v=0x10\n").unwrap();
        assert_eq!(root.get("v"), Some(&Value::Number(16.0)));
    }

    #[test]
    fn test_edge_kv3_key_then_end() {
        let err = kv3(b"key ").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Expected unexpected token but found T_END"));
    }

    #[test]
    fn test_edge_kv3_stray_close() {
        let err = kv3(b"key \"tag\" \"v\"\n]").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Expected object key string but found T_ARR_END"));
    }

    #[test]
    fn test_edge_comment_only_documents() {
        assert!(matches!(kv0(b"/ nothing\n"), Ok(Value::Object(m)) if m.is_empty()));
        assert!(matches!(kv1(b"<!-- x -->"), Ok(Value::Object(m)) if m.is_empty()));
        assert!(matches!(kv3(b"<!-- x -->"), Ok(Value::Object(m)) if m.is_empty()));
    }
}
