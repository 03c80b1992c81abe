//! Per-dialect character classification and escape tables.
//!
//! Each dialect owns a fixed 256-entry table mapping a byte to the token
//! class that drives the tokenizer's outer loop. Every byte starts as
//! `Error` and the dialect's vocabulary is overlaid on top.

/// Token-class hint for a single input byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenClass {
    ObjBegin,
    ObjEnd,
    ArrBegin,
    ArrEnd,
    Comma,
    Colon,
    /// `#` include marker (KV0).
    Ref,
    /// `/` line-comment opener (KV0).
    Comment,
    Whitespace,
    /// NUL: end of input.
    End,
    /// Needs further inspection (string, number, bare identifier, or a
    /// block-comment opener).
    Unknown,
    Error,
}

/// Comment syntax accepted between tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentStyle {
    /// `//`-less KV0 style: a single `/` starts a comment running to CR/LF.
    Line,
    /// `<!-- … -->` blocks (KV1/KV3), recognized by lookahead after `<`.
    Block,
}

/// Quoted-string decoding behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringStyle {
    /// KV0: escape table plus `\uXXXX` (with UTF-16 surrogate pairs).
    Escaped,
    /// KV1/KV3: no escape decoding; every backslash run collapses to one
    /// `/` before the following byte.
    Collapsed,
}

/// Everything the tokenizer needs to know about one dialect's lexical
/// surface. Built once per dialect handle and borrowed by each parse.
pub struct LexConfig {
    pub classes: [TokenClass; 256],
    /// Escape-decode table: `\x` maps to `escapes[x]`; 0 marks an invalid
    /// escape and `b'u'` requests unicode decoding. Used by `Escaped`
    /// string scanning only.
    pub escapes: [u8; 256],
    pub comments: CommentStyle,
    pub strings: StringStyle,
    /// Bare (unquoted) strings for alphabetic lead bytes.
    pub bare_strings: bool,
    /// Key slots also accept digit/`-` lead bytes as bare strings (KV1).
    pub digit_keys: bool,
}

impl LexConfig {
    /// KV0: `{}` containers, tab-separated pairs, `#` references, `/`
    /// line comments, full escape decoding.
    pub fn kv0() -> Self {
        let mut classes = [TokenClass::Error; 256];
        classes[b'{' as usize] = TokenClass::ObjBegin;
        classes[b'}' as usize] = TokenClass::ObjEnd;
        classes[b',' as usize] = TokenClass::Comma;
        classes[0] = TokenClass::End;
        classes[b'#' as usize] = TokenClass::Ref;
        classes[b'/' as usize] = TokenClass::Comment;
        for ws in [b' ', b'\t', b'\n', b'\r'] {
            classes[ws as usize] = TokenClass::Whitespace;
        }
        // Bytes that can begin a literal. Note: t/f/n and friends are
        // classified for inspection but no keyword is recognized, so a
        // bare `true` still token-errors.
        for ch in [b'f', b'i', b'I', b'n', b'N', b't', b'"', b'+', b'-'] {
            classes[ch as usize] = TokenClass::Unknown;
        }
        for digit in b'0'..=b'9' {
            classes[digit as usize] = TokenClass::Unknown;
        }

        Self {
            classes,
            escapes: escape_table(),
            comments: CommentStyle::Line,
            strings: StringStyle::Escaped,
            bare_strings: false,
            digit_keys: false,
        }
    }

    /// KV1: `{}`/`[]` containers, `=` separator, block comments, bare
    /// identifiers (including numeric keys), collapsed backslashes.
    pub fn kv1() -> Self {
        Self {
            digit_keys: true,
            ..Self::bracketed()
        }
    }

    /// KV3: same lexical surface as KV1 except numeric keys.
    pub fn kv3() -> Self {
        Self::bracketed()
    }

    fn bracketed() -> Self {
        let mut classes = [TokenClass::Error; 256];
        classes[b'{' as usize] = TokenClass::ObjBegin;
        classes[b'}' as usize] = TokenClass::ObjEnd;
        classes[b'[' as usize] = TokenClass::ArrBegin;
        classes[b']' as usize] = TokenClass::ArrEnd;
        classes[b',' as usize] = TokenClass::Comma;
        classes[b'=' as usize] = TokenClass::Colon;
        classes[0] = TokenClass::End;
        for ws in [b' ', b'\t', b'\n', b'\r'] {
            classes[ws as usize] = TokenClass::Whitespace;
        }
        for ch in [b'"', b'+', b'-', b'<'] {
            classes[ch as usize] = TokenClass::Unknown;
        }
        for digit in b'0'..=b'9' {
            classes[digit as usize] = TokenClass::Unknown;
        }
        for letter in b'a'..=b'z' {
            classes[letter as usize] = TokenClass::Unknown;
            classes[letter.to_ascii_uppercase() as usize] = TokenClass::Unknown;
        }

        Self {
            classes,
            escapes: escape_table(),
            comments: CommentStyle::Block,
            strings: StringStyle::Collapsed,
            bare_strings: true,
            digit_keys: false,
        }
    }
}

/// The shared escape-decode table. 0 marks an invalid escape byte.
fn escape_table() -> [u8; 256] {
    let mut escapes = [0u8; 256];
    escapes[b'"' as usize] = b'"';
    escapes[b'\\' as usize] = b'\\';
    escapes[b'/' as usize] = b'/';
    escapes[b'b' as usize] = 0x08;
    escapes[b't' as usize] = b'\t';
    escapes[b'n' as usize] = b'\n';
    escapes[b'f' as usize] = 0x0C;
    escapes[b'r' as usize] = b'\r';
    // Unicode escapes need multi-byte decoding.
    escapes[b'u' as usize] = b'u';
    escapes
}
