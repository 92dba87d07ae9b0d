//! Space-separated output.


/// Writes words separated by single spaces.
///
/// The separator is emitted before every word except the first one written
/// through this writer, so several queries sharing one writer join cleanly.
pub struct SsvWriter<'a> {
    out: &'a mut String,
    wrote: bool,
}

impl<'a> SsvWriter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        SsvWriter { out, wrote: false }
    }

    pub fn write_word(&mut self, word: &str) {
        self.start_word();
        self.out.push_str(word);
    }

    /// Write `base` and `rel` joined by `/` as one word.
    ///
    /// A trailing slash on `base` is not doubled, matching how both `find`
    /// and `os.path.join` print paths.
    pub fn write_path(&mut self, base: &str, rel: &str) {
        self.start_word();
        self.out.push_str(base);
        if !base.ends_with('/') {
            self.out.push('/');
        }
        self.out.push_str(rel);
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        !self.wrote
    }

    fn start_word(&mut self) {
        if self.wrote {
            self.out.push(' ');
        }
        self.wrote = true;
    }
}
