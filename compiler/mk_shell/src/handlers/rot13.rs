//! `echo $(1) | tr 'a-zA-Z' 'n-za-mN-ZA-M'`

use mk_ir::Value;
use mk_scan::{has_shell_meta, words};

use super::run_original;
use crate::errors::EvalResult;
use crate::exec::{resolve_concat, ShellCall, ShellExecutor};

pub(crate) struct Rot13 {
    text: Value,
}

impl Rot13 {
    pub(crate) fn new(text: Value) -> Self {
        Rot13 { text }
    }

    pub(crate) fn eval(
        &self,
        shell: &ShellCall,
        out: &mut String,
        exec: &mut dyn ShellExecutor,
    ) -> EvalResult {
        let text = resolve_concat(exec, std::slice::from_ref(&self.text))?;
        if has_shell_meta(&text) {
            return run_original("rot13", "shell metacharacters in argument", shell, out, exec);
        }
        // `echo -n`, `-e` and friends consume their first word as an option.
        if words(&text).next().is_some_and(|word| word.starts_with('-')) {
            return run_original("rot13", "argument may be read as an echo option", shell, out, exec);
        }
        // `echo` sees the unquoted argument after word splitting.
        for (i, word) in words(&text).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.extend(word.chars().map(rotate));
        }
        Ok(())
    }
}

/// Rotate ASCII letters by 13 within their case; everything else is kept.
pub fn rot13(text: &str) -> String {
    text.chars().map(rotate).collect()
}

fn rotate(c: char) -> char {
    let Ok(b) = u8::try_from(c) else {
        return c;
    };
    let base = match b {
        b'a'..=b'z' => b'a',
        b'A'..=b'Z' => b'A',
        _ => return c,
    };
    char::from(base + (b - base + 13) % 26)
}
