//! Step definitions, lifecycle hooks and feature orchestration for
//! behaviour tests written against Gherkin features.
//!
//! The crate is organised around four pieces:
//!
//! - [`extract_definitions`] discovers `Given`/`When`/`Then` registrations in
//!   step-definition source text.
//! - [`Matcher`] compiles a [`Definition`] and tests step text against it.
//! - [`StepRegistry`] and [`HookRegistry`] hold handlers and lifecycle
//!   callbacks.
//! - [`Runner`] declares features, scenarios and steps on a [`TestHost`];
//!   [`StdHost`] runs them in-process.
//!
//! Pattern compilation lives in [`stepwise_patterns`], re-exported here for
//! the types handlers receive.

mod definition;
mod error;
mod extract;
mod feature;
mod hooks;
mod matcher;
mod panic;
mod registry;
mod runner;

pub use definition::{Definition, Variant};
pub use error::{FeatureParseError, HookError, RunnerError, StepError, StepPatternError};
pub use extract::{Extraction, ExtractionDiagnostic, ExtractionError, extract_definitions};
pub use feature::{FeatureDoc, FeatureInput, ScenarioDoc, StepDoc, parse_feature_text};
pub use hooks::{Hook, HookRegistry, HookSlot};
pub use matcher::{Matcher, StepPattern};
pub use panic::panic_message;
pub use registry::{ResolvedStep, StepHandler, StepRegistry};
pub use runner::{
    DescribeBody, RunReport, Runner, RunnerBuilder, StdHost, TestBody, TestHost, TestOutcome,
    TestStatus, feature_group_name, scenario_group_name, step_test_name,
};
pub use stepwise_patterns::{StepType, StepValue};
