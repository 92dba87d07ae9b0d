//! Reader for make command text.
//!
//! Recognizes the reference forms that matter for shell fast paths and keeps
//! everything else literal. Function calls are parsed structurally so that a
//! call never masquerades as a plain variable reference.

use memchr::memchr;

use crate::{Expr, Value};


/// Error reading command text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated variable reference starting at byte {offset}")]
    Unterminated { offset: usize },
}

/// Parse make text into a segment expression.
pub fn parse_command(text: &str) -> Result<Expr, ParseError> {
    parse_at(text, 0)
}

/// Parse `text`, reporting offsets relative to `base` in the original input.
fn parse_at(text: &str, base: usize) -> Result<Expr, ParseError> {
    let bytes = text.as_bytes();
    let mut expr = Expr::new();
    let mut pos = 0;

    while let Some(off) = memchr(b'$', &bytes[pos..]) {
        let dollar = pos + off;
        expr.push(Value::literal(&text[pos..dollar]));

        let Some(&next) = bytes.get(dollar + 1) else {
            // A trailing '$' has nothing to reference.
            expr.push(Value::literal("$"));
            return Ok(expr);
        };

        pos = match next {
            b'$' => {
                expr.push(Value::literal("$"));
                dollar + 2
            }
            b'(' | b'{' => {
                let close = if next == b'(' { b')' } else { b'}' };
                let inner_start = dollar + 2;
                let inner_end = find_close(bytes, inner_start, next, close).ok_or(
                    ParseError::Unterminated {
                        offset: base + dollar,
                    },
                )?;
                expr.push(reference(
                    &text[inner_start..inner_end],
                    base + inner_start,
                )?);
                inner_end + 1
            }
            b'0'..=b'9' => {
                expr.push(Value::param(u32::from(next - b'0')));
                dollar + 2
            }
            _ => {
                // Single-character variable name; may be multi-byte UTF-8.
                let ch_len = text[dollar + 1..].chars().next().map_or(1, char::len_utf8);
                expr.push(Value::var(&text[dollar + 1..dollar + 1 + ch_len]));
                dollar + 1 + ch_len
            }
        };
    }

    expr.push(Value::literal(&text[pos..]));
    Ok(expr)
}

/// Find the byte index of the `close` matching an already consumed `open`.
fn find_close(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if b == open {
            depth += 1;
        } else if b == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

/// Classify the text inside `$(...)`.
fn reference(inner: &str, base: usize) -> Result<Value, ParseError> {
    if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = inner.parse::<u32>() {
            return Ok(Value::param(index));
        }
    }

    let Some(space) = inner.find([' ', '\t']) else {
        return Ok(Value::var(inner));
    };
    let name = &inner[..space];
    if name.contains(['$', '(', '{']) {
        // Computed variable names stay opaque.
        return Ok(Value::var(inner));
    }

    let args_start = space + 1;
    let mut args = Vec::new();
    for (start, end) in split_args(inner, args_start) {
        args.push(parse_at(&inner[start..end], base + start)?);
    }
    Ok(Value::call(name, args))
}

/// Byte ranges of the comma-separated arguments at nesting depth zero.
fn split_args(inner: &str, start: usize) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut arg_start = start;
    for (i, b) in inner.bytes().enumerate().skip(start) {
        match b {
            b'(' | b'{' => depth += 1,
            b')' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                ranges.push((arg_start, i));
                arg_start = i + 1;
            }
            _ => {}
        }
    }
    ranges.push((arg_start, inner.len()));
    ranges
}
