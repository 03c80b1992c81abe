//! KV0 file mode: whole-file loads with `#include` resolution.
//!
//! Decoding a file produces one outer object. The file's own pair is
//! inserted under its leaf filename, and every file named by a
//! `# "relative/path"` reference ahead of the body is decoded the same way
//! (recursively) into that same outer object, keyed by its own leaf
//! filename. Includes resolve relative to the including file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use textkv_lex::{LexConfig, TokenClass, Tokenizer};
use textkv_util::{Config, DecodeError, Map, Value};

use crate::kv0::Kv0Parser;

/// Decodes `path` and its includes into one outer object.
pub fn decode_file(path: &Path, lex: &LexConfig, cfg: &Config) -> Result<Value, DecodeError> {
    let mut root = Map::default();
    decode_file_into(path, lex, cfg, &mut root)?;
    Ok(Value::Object(root))
}

fn decode_file_into(
    path: &Path,
    lex: &LexConfig,
    cfg: &Config,
    root: &mut Map,
) -> Result<(), DecodeError> {
    let data = fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tokens = Tokenizer::new(&data, lex, cfg.decode_invalid_numbers);
    if !tokens.skip_bom() && tokens.class_at_cursor() == TokenClass::Error {
        return Err(DecodeError::NotUtf8);
    }

    resolve_includes(&mut tokens, path, lex, cfg, root)?;

    let mut parser = Kv0Parser::from_tokenizer(tokens, cfg);
    let content = parser.parse_root(false)?;
    root.insert(leaf_filename(path), Value::Object(content));
    Ok(())
}

/// The pre-pass ahead of a file body. Honors whitespace, comments, and
/// `#` references only; the first byte outside that set ends the pass and
/// normal parsing takes over.
fn resolve_includes(
    tokens: &mut Tokenizer<'_>,
    path: &Path,
    lex: &LexConfig,
    cfg: &Config,
    root: &mut Map,
) -> Result<(), DecodeError> {
    loop {
        match tokens.class_at_cursor() {
            TokenClass::Whitespace => tokens.bump(),
            TokenClass::Comment => tokens.skip_line_comment(),
            TokenClass::Ref => {
                tokens.bump();
                if !tokens.seek_quote() {
                    return Ok(());
                }
                let relative = match tokens.read_raw_quoted() {
                    Some(bytes) => bytes,
                    None => return Ok(()),
                };
                tokens.bump();
                let target = sibling_path(path, &relative);
                decode_file_into(&target, lex, cfg, root)?;
            }
            _ => return Ok(()),
        }
    }
}

/// Resolves an include path against the including file's directory.
fn sibling_path(including: &Path, relative: &[u8]) -> PathBuf {
    let relative = PathBuf::from(String::from_utf8_lossy(relative).into_owned());
    match including.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(relative),
        _ => relative,
    }
}

/// The path segment after the last `/` or `\`, as the outer-object key.
fn leaf_filename(path: &Path) -> Vec<u8> {
    let text = path.to_string_lossy();
    let bytes = text.as_bytes();
    let start = bytes
        .iter()
        .rposition(|b| *b == b'/' || *b == b'\\')
        .map(|i| i + 1)
        .unwrap_or(0);
    bytes[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    fn decode(path: &Path) -> Result<Value, DecodeError> {
        let lex = LexConfig::kv0();
        decode_file(path, &lex, &Config::default())
    }

    #[test]
    fn test_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "solo.kv", b"\"root\"\t{ \"x\"\t\"1\" }");

        let outer = decode(&path).unwrap();
        let content = outer.get("solo.kv").unwrap();
        assert_eq!(
            content.get("root").and_then(|v| v.get("x")),
            Some(&Value::from("1"))
        );
    }

    #[test]
    fn test_include_sibling() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "child.kv", b"\"c\"\t{ \"y\"\t\"9\" }");
        let base = write_file(
            dir.path(),
            "base.kv",
            b"# \"child.kv\"\n\"root\"\t{ \"x\"\t\"1\" }",
        );

        let outer = decode(&base).unwrap();
        assert_eq!(
            outer.get("base.kv").and_then(|v| v.get("root")).and_then(|v| v.get("x")),
            Some(&Value::from("1"))
        );
        assert_eq!(
            outer.get("child.kv").and_then(|v| v.get("c")).and_then(|v| v.get("y")),
            Some(&Value::from("9"))
        );
    }

    #[test]
    fn test_include_transitive() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "c.kv", b"\"cc\"\t{ \"v\"\t\"3\" }");
        write_file(dir.path(), "b.kv", b"# \"c.kv\"\n\"bb\"\t{ \"v\"\t\"2\" }");
        let a = write_file(dir.path(), "a.kv", b"# \"b.kv\"\n\"aa\"\t{ \"v\"\t\"1\" }");

        let outer = decode(&a).unwrap();
        for (file, key) in [("a.kv", "aa"), ("b.kv", "bb"), ("c.kv", "cc")] {
            assert!(
                outer.get(file).and_then(|v| v.get(key)).is_some(),
                "{} missing",
                file
            );
        }
    }

    #[test]
    fn test_multiple_includes() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "one.kv", b"\"one\"\t{ }");
        write_file(dir.path(), "two.kv", b"\"two\"\t{ }");
        let base = write_file(
            dir.path(),
            "main.kv",
            b"# \"one.kv\"\n# \"two.kv\"\n\"main\"\t{ }",
        );

        let outer = decode(&base).unwrap();
        assert!(outer.get("one.kv").is_some());
        assert!(outer.get("two.kv").is_some());
        assert!(outer.get("main.kv").is_some());
    }

    #[test]
    fn test_bom_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let body = b"\"root\"\t{ \"x\"\t\"1\" }";
        let with_bom: Vec<u8> = [&[0xEF, 0xBB, 0xBF][..], body].concat();
        let plain = write_file(dir.path(), "plain.kv", body);
        let bom = write_file(dir.path(), "bom.kv", &with_bom);

        let plain_tree = decode(&plain).unwrap();
        let bom_tree = decode(&bom).unwrap();
        assert_eq!(plain_tree.get("plain.kv"), bom_tree.get("bom.kv"));
    }

    #[test]
    fn test_non_utf8_lead_byte_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.kv", &[0xFE, 0xFF, b'x', b'y']);
        assert!(matches!(decode(&path), Err(DecodeError::NotUtf8)));
    }

    #[test]
    fn test_missing_include_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_file(dir.path(), "base.kv", b"# \"absent.kv\"\n\"root\"\t{ }");
        assert!(matches!(decode(&base), Err(DecodeError::Io { .. })));
    }

    #[test]
    fn test_comments_before_include() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "inc.kv", b"\"i\"\t{ }");
        let base = write_file(
            dir.path(),
            "base.kv",
            b"/ header comment\n# \"inc.kv\"\n\"root\"\t{ }",
        );

        let outer = decode(&base).unwrap();
        assert!(outer.get("inc.kv").is_some());
        assert!(outer.get("base.kv").is_some());
    }
}
