//! Shared step-pattern utilities for stepwise.
//!
//! The crate exposes the step keyword enum, the Cucumber parameter types and
//! the expression compiler reused by both the runtime registry and the
//! command line tooling, so the two agree on how a pattern matches.

mod capture;
mod errors;
mod expression;
mod keyword;
mod parameter;

pub use capture::capture_text_arguments;
pub use errors::{CoercionError, ExpressionSyntaxError, PatternError, SyntaxErrorKind};
pub use expression::{CompiledExpression, build_regex_from_expression, compile_expression};
pub use keyword::{StepType, StepTypeParseError, UnsupportedStepType};
pub use parameter::{ParameterType, StepValue};
