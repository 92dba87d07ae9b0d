//! Segment values and expressions.

use std::fmt;
use std::sync::Arc;


/// One segment of a command expression.
///
/// Cloning is cheap: all text is reference counted, so captures taken by the
/// matcher share storage with the expression they came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Fixed text.
    Literal(Arc<str>),
    /// Reference to a named variable, resolved at evaluation time.
    VarRef(Arc<str>),
    /// Reference to a positional macro parameter (`$(1)`).
    Param(u32),
    /// Function call whose result is only known at evaluation time.
    Call(Arc<Call>),
}

/// A make function call such as `$(dir $(x))`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Call {
    pub name: Arc<str>,
    pub args: Vec<Expr>,
}

impl Value {
    pub fn literal(text: impl Into<Arc<str>>) -> Self {
        Value::Literal(text.into())
    }

    pub fn var(name: impl Into<Arc<str>>) -> Self {
        Value::VarRef(name.into())
    }

    pub fn param(index: u32) -> Self {
        Value::Param(index)
    }

    pub fn call(name: impl Into<Arc<str>>, args: Vec<Expr>) -> Self {
        Value::Call(Arc::new(Call {
            name: name.into(),
            args,
        }))
    }

    /// Text of a literal segment.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is an unresolved variable or parameter reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::VarRef(_) | Value::Param(_))
    }

    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Literal(_) => "literal",
            Value::VarRef(_) => "variable reference",
            Value::Param(_) => "parameter reference",
            Value::Call(_) => "function call",
        }
    }
}

impl fmt::Display for Value {
    /// Render as make source text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(text) => {
                for (i, part) in text.split('$').enumerate() {
                    if i > 0 {
                        f.write_str("$$")?;
                    }
                    f.write_str(part)?;
                }
                Ok(())
            }
            Value::VarRef(name) => write!(f, "$({name})"),
            Value::Param(index) => write!(f, "$({index})"),
            Value::Call(call) => {
                write!(f, "$({} ", call.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// An ordered sequence of segments.
///
/// Adjacent literals never appear next to each other: [`Expr::push`] folds
/// them together, so two expressions spelling the same text always have the
/// same shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Expr {
    segments: Vec<Value>,
}

impl Expr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment, merging it into a trailing literal when both are
    /// literals. Empty literals are dropped.
    pub fn push(&mut self, value: Value) {
        if let Value::Literal(text) = &value {
            if text.is_empty() {
                return;
            }
            if let Some(Value::Literal(prev)) = self.segments.last_mut() {
                let mut merged = String::with_capacity(prev.len() + text.len());
                merged.push_str(prev);
                merged.push_str(text);
                *prev = merged.into();
                return;
            }
        }
        self.segments.push(value);
    }

    pub fn segments(&self) -> &[Value] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the expression needs no resolution at all.
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(|v| matches!(v, Value::Literal(_)))
    }
}

impl FromIterator<Value> for Expr {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut expr = Expr::new();
        for value in iter {
            expr.push(value);
        }
        expr
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
