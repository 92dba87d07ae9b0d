//! `date +FORMAT` against the configured build timestamp.

use std::fmt::Write;

use chrono::format::{Fixed, Item, Numeric, Pad};
use chrono::NaiveDateTime;

use crate::errors::EvalResult;

pub(crate) struct ShellDate {
    timestamp: NaiveDateTime,
    items: Vec<Item<'static>>,
}

impl ShellDate {
    pub(crate) fn new(timestamp: NaiveDateTime, format: &str) -> Self {
        ShellDate {
            timestamp,
            items: translate_format(format),
        }
    }

    pub(crate) fn eval(&self, out: &mut String) -> EvalResult {
        write!(out, "{}", self.timestamp.format_with_items(self.items.iter()))?;
        Ok(())
    }
}

fn directive(spec: u8) -> Option<Item<'static>> {
    let item = match spec {
        b'Y' => Item::Numeric(Numeric::Year, Pad::Zero),
        b'm' => Item::Numeric(Numeric::Month, Pad::Zero),
        b'd' => Item::Numeric(Numeric::Day, Pad::Zero),
        b'H' => Item::Numeric(Numeric::Hour, Pad::Zero),
        b'M' => Item::Numeric(Numeric::Minute, Pad::Zero),
        b'S' => Item::Numeric(Numeric::Second, Pad::Zero),
        b'b' => Item::Fixed(Fixed::ShortMonthName),
        b'k' => Item::Numeric(Numeric::Hour, Pad::Space),
        _ => return None,
    };
    Some(item)
}

/// Translate a `date` format string into formatting items.
///
/// Only `%Y %m %d %H %M %S %b %k` are understood. Any other text, including
/// other `%` directives, is copied to the output as is.
pub fn translate_format(format: &str) -> Vec<Item<'static>> {
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut rest = format;
    while let Some(pos) = rest.find('%') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.bytes().next().and_then(directive) {
            Some(item) => {
                if !literal.is_empty() {
                    items.push(Item::OwnedLiteral(std::mem::take(&mut literal).into()));
                }
                items.push(item);
                rest = &after[1..];
            }
            None => {
                literal.push('%');
                rest = after;
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        items.push(Item::OwnedLiteral(literal.into()));
    }
    items
}
