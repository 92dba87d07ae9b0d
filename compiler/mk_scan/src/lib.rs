//! Text scanning utilities for resolved make values.
//!
//! Variable values reach the shell fast paths as plain text: a list of
//! directories, a single path with stray whitespace, a file name. The value is
//! spliced unquoted into a command line, so the shell decides where one word
//! ends. Every handler that consumes a list goes through [`WordScanner`]
//! rather than ad-hoc splitting.
//!
//! Separators are the shell's default field separators: space, tab and
//! newline. Form feed and carriage return are ordinary bytes to the shell and
//! stay inside a word.


/// Whether `b` separates words.
#[inline]
pub const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n')
}

/// Iterator over the whitespace-delimited words of a string.
///
/// Never yields empty words; leading, trailing and repeated separators are
/// skipped.
#[derive(Clone, Debug)]
pub struct WordScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> WordScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        WordScanner { text, pos: 0 }
    }

    /// The unscanned remainder, including any leading whitespace.
    pub fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or("")
    }
}

impl<'a> Iterator for WordScanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        let start = bytes
            .get(self.pos..)?
            .iter()
            .position(|&b| !is_space(b))
            .map(|off| self.pos + off)?;
        let end = bytes[start..]
            .iter()
            .position(|&b| is_space(b))
            .map_or(bytes.len(), |off| start + off);
        self.pos = end;
        // Separators are ASCII, so both bounds sit on char boundaries.
        self.text.get(start..end)
    }
}

/// Split `text` into make words.
pub fn words(text: &str) -> WordScanner<'_> {
    WordScanner::new(text)
}

/// Strip leading and trailing whitespace.
pub fn trim_space(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii() && is_space(c as u8))
}

/// Whether a path could step outside its starting directory.
///
/// Any occurrence of `..` counts, not only whole components: a name like
/// `a..b` is rejected too. The fast paths only need a conservative answer.
pub fn has_parent_ref(path: &str) -> bool {
    path.contains("..")
}

/// Bytes the shell would interpret when the text is spliced unquoted into a
/// command line.
const SHELL_META: &[u8] = b"\\'\"`$;&|<>()*?[]{}#~!";

/// Whether splicing `text` into a command line could change how the shell
/// parses or expands it.
pub fn has_shell_meta(text: &str) -> bool {
    text.bytes().any(|b| SHELL_META.contains(&b))
}
