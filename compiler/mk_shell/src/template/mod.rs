//! Templates and the structural matcher.
//!
//! A template is a segment sequence with the same shape as the live command
//! it recognizes. Matching is positional and all-or-nothing: both sequences
//! must have the same length and every pair must be kind-compatible.
//!
//! | template segment | live segment            | result                         |
//! |------------------|-------------------------|--------------------------------|
//! | `Literal`        | `Literal`, equal text   | match                          |
//! | `Var`            | `VarRef` / `Param`      | capture the live value         |
//! | `Pattern`        | `Literal`, full match   | capture each group as literal  |
//! | anything else    |                         | no match                       |

use mk_ir::Value;
use regex::Regex;
use smallvec::SmallVec;


/// One segment of a template.
#[derive(Clone, Debug)]
pub enum Segment {
    /// Exact text.
    Literal(&'static str),
    /// One unresolved variable or parameter reference, captured opaquely.
    Var(&'static str),
    /// Literal text fully matching `regex`; group `i` is captured under
    /// `slots[i]`.
    Pattern {
        source: &'static str,
        regex: Regex,
        slots: &'static [&'static str],
    },
}

impl Segment {
    /// Compile a pattern segment, anchored at both ends.
    pub fn pattern(
        source: &'static str,
        slots: &'static [&'static str],
    ) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"\A(?:{source})\z"))?;
        Ok(Segment::Pattern {
            source,
            regex,
            slots,
        })
    }

    /// Slot names this segment captures into, in capture order.
    pub fn slots(&self) -> &[&'static str] {
        match self {
            Segment::Literal(_) => &[],
            Segment::Var(slot) => std::slice::from_ref(slot),
            Segment::Pattern { slots, .. } => *slots,
        }
    }
}

/// Values captured by a successful match, keyed by slot name.
///
/// Slots keep template order; a compactor looks them up by name so that it
/// does not depend on where in the template a slot sits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Captures {
    slots: SmallVec<[(&'static str, Value); 4]>,
}

impl Captures {
    pub fn get(&self, slot: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(name, _)| *name == slot)
            .map(|(_, value)| value)
    }

    /// Captured values in template order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter().map(|(_, value)| value)
    }

    /// Slot names in template order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn push(&mut self, slot: &'static str, value: Value) {
        self.slots.push((slot, value));
    }
}

/// Align `live` against `template`.
pub fn match_template(live: &[Value], template: &[Segment]) -> Option<Captures> {
    if live.len() != template.len() {
        return None;
    }
    let mut captures = Captures::default();
    for (value, segment) in live.iter().zip(template) {
        match (segment, value) {
            (Segment::Literal(expected), Value::Literal(text)) => {
                if &**text != *expected {
                    return None;
                }
            }
            (Segment::Var(slot), value) if value.is_reference() => {
                captures.push(*slot, value.clone());
            }
            (Segment::Pattern { regex, slots, .. }, Value::Literal(text)) => {
                let groups = regex.captures(text)?;
                for (slot, group) in slots.iter().zip(groups.iter().skip(1)) {
                    let text = group.map_or("", |m| m.as_str());
                    captures.push(*slot, Value::literal(text));
                }
            }
            _ => return None,
        }
    }
    Some(captures)
}
