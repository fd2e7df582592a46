//! Helpers shared by the stepwise integration tests.
//!
//! Each test binary compiles this module on its own, so a helper one binary
//! does not call is dead code there and used code elsewhere.

#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    reason = "unfulfilled_lint_expectations must be allowed for shared helpers"
)]

use std::path::PathBuf;

use stepwise::{StepError, StepValue};

/// Handler that accepts any arguments and does nothing.
#[expect(
    clippy::unnecessary_wraps,
    reason = "handler must match the registry's fallible signature"
)]
pub fn noop(_: &[StepValue]) -> Result<(), StepError> {
    Ok(())
}

/// Read a file under this crate's `tests/` directory.
#[expect(dead_code, reason = "unused by the step_registry test binary")]
#[allow(unfulfilled_lint_expectations)]
pub fn read_fixture(relative: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()))
}
