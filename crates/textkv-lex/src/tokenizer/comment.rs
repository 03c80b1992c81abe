//! Comment skipping.
//!
//! KV0 uses line comments: any `/` outside a string runs to the next CR or
//! LF. KV1/KV3 use `<!-- … -->` blocks, recognized by a three-byte
//! lookahead after `<`.

use crate::tokenizer::Tokenizer;

impl<'a> Tokenizer<'a> {
    /// Consumes a line comment. The cursor must be on the opening `/`;
    /// it is left on the terminating CR/LF (or at end of input), which the
    /// caller's whitespace loop then eats.
    pub fn skip_line_comment(&mut self) {
        loop {
            self.cursor.bump();
            match self.cursor.current() {
                b'\r' | b'\n' => return,
                0 if self.cursor.is_at_end() => return,
                _ => {}
            }
        }
    }

    /// True when the cursor sits on `<` opening a `<!--` marker.
    pub(crate) fn is_block_comment_start(&self) -> bool {
        self.cursor.peek(1) == b'!' && self.cursor.peek(2) == b'-' && self.cursor.peek(3) == b'-'
    }

    /// Consumes a `<!-- … -->` block. The cursor must be on the `<`.
    ///
    /// The terminator match resets completely on a mismatched byte, so a
    /// run like `--->` does not close the block; this matches the format's
    /// established behavior.
    pub(crate) fn skip_block_comment(&mut self) {
        self.cursor.bump_n(4);

        const TERMINATOR: &[u8; 3] = b"-->";
        let mut matched = 0usize;
        while !self.cursor.is_at_end() {
            let ch = self.cursor.current();
            self.cursor.bump();
            if ch == TERMINATOR[matched] {
                matched += 1;
                if matched == TERMINATOR.len() {
                    return;
                }
            } else {
                matched = 0;
            }
        }
    }
}
