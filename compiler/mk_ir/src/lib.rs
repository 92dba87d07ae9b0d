//! Mk IR - segment model for shell invocations inside make recipes.
//!
//! A `$(shell ...)` call reaches the optimizer as an [`Expr`]: an ordered list
//! of [`Value`] segments. Literal text is already known; variable and
//! parameter references are still unresolved and only become text when the
//! evaluator resolves them against a concrete context.
//!
//! # Segments
//!
//! - `Literal`: fixed text, adjacent literals are always merged
//! - `VarRef`: `$(NAME)`, `${NAME}` or `$X`
//! - `Param`: `$(1)`, `$1` (macro parameters inside `define`/`call`)
//! - `Call`: any other function call, e.g. `$(dir $(x))`
//!
//! [`parse_command`] turns make text into an `Expr`. The full evaluator builds
//! expressions itself; the reader exists so tools and tests can spell
//! commands the way they appear in a makefile.

mod parse;
mod value;

pub use parse::{parse_command, ParseError};
pub use value::{Call, Expr, Value};
