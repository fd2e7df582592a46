//! In-process test host.
//!
//! [`StdHost`] runs each test as soon as it is declared, so declaration
//! order is execution order. Groups form a stack of scopes:
//!
//! - `before_all` hooks of a scope run lazily, before the first test inside
//!   it; a scope with no tests never runs them.
//! - `after_all` hooks run when a started scope closes.
//! - `before_each` hooks run outer to inner before every test, and
//!   `after_each` hooks run inner to outer after it, even when the test
//!   failed.
//!
//! Panics in tests and hooks are caught and recorded as failures.

use std::fmt;

use log::{info, warn};

use crate::error::{RunnerError, StepError};
use crate::hooks::{Hook, HookSlot};
use crate::panic::run_guarded;

use super::host::{DescribeBody, TestBody, TestHost};

/// Result of one test or hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    /// Completed without error.
    Passed,
    /// Returned an error or panicked.
    Failed(StepError),
}

impl TestStatus {
    fn from_result(result: Result<(), StepError>) -> Self {
        result.map_or_else(Self::Failed, |()| Self::Passed)
    }

    /// Whether the status is [`TestStatus::Passed`].
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// One executed test, or a failed `afterAll` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    /// Names of the enclosing groups, outermost first.
    pub path: Vec<String>,
    /// Test name.
    pub name: String,
    /// What happened.
    pub status: TestStatus,
}

/// Everything a [`StdHost`] ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<TestOutcome>,
}

impl RunReport {
    /// Outcomes in execution order.
    #[must_use]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Number of passed tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    /// Outcomes that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_passed())
    }

    /// Whether nothing failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Default)]
struct Scope {
    name: Option<String>,
    before_all: Vec<Hook>,
    after_all: Vec<Hook>,
    before_each: Vec<Hook>,
    after_each: Vec<Hook>,
    started: bool,
    setup_failure: Option<StepError>,
}

impl Scope {
    fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn hooks_mut(&mut self, slot: HookSlot) -> &mut Vec<Hook> {
        match slot {
            HookSlot::BeforeAll => &mut self.before_all,
            HookSlot::AfterAll => &mut self.after_all,
            HookSlot::BeforeEach => &mut self.before_each,
            HookSlot::AfterEach => &mut self.after_each,
        }
    }
}

/// Runs tests in-process as they are declared.
///
/// # Examples
///
/// ```
/// use stepwise::{StdHost, TestBody, TestHost};
///
/// let mut host = StdHost::new();
/// host.describe("group", &mut |host| {
///     host.test("passes", TestBody::new(|| Ok(())))
/// })
/// .expect("std host supports every method");
/// let report = host.finish();
/// assert_eq!(report.passed(), 1);
/// assert_eq!(report.outcomes()[0].path, ["group"]);
/// ```
pub struct StdHost {
    scopes: Vec<Scope>,
    report: RunReport,
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdHost")
            .field("path", &self.path())
            .field("report", &self.report)
            .finish()
    }
}

impl StdHost {
    /// Create a host with an empty root scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            report: RunReport::default(),
        }
    }

    /// Outcomes recorded so far.
    #[must_use]
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Close the root scope, running its `after_all` hooks if any test ran,
    /// and return the report.
    #[must_use]
    pub fn finish(mut self) -> RunReport {
        if let Some(root) = self.scopes.pop() {
            self.close(root);
        }
        self.report
    }

    fn path(&self) -> Vec<String> {
        self.scopes
            .iter()
            .filter_map(|scope| scope.name.clone())
            .collect()
    }

    fn attach(&mut self, slot: HookSlot, hook: Hook) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.hooks_mut(slot).push(hook);
        }
    }

    /// Run pending `before_all` hooks, outermost scope first, and return the
    /// first setup failure affecting the current scope.
    fn start_scopes(&mut self) -> Result<(), StepError> {
        for scope in &mut self.scopes {
            if !scope.started {
                scope.started = true;
                scope.setup_failure = run_hooks(&scope.before_all).err();
            }
            if let Some(err) = &scope.setup_failure {
                return Err(err.clone());
            }
        }
        Ok(())
    }

    fn run_test(&mut self, body: TestBody) -> Result<(), StepError> {
        self.start_scopes()?;
        let before = self
            .scopes
            .iter()
            .try_for_each(|scope| run_hooks(&scope.before_each));
        let result = before.and_then(|()| run_guarded(|| body.run()));
        let after = self
            .scopes
            .iter()
            .rev()
            .map(|scope| run_hooks(&scope.after_each))
            .fold(Ok(()), Result::and);
        result.and(after)
    }

    fn close(&mut self, scope: Scope) {
        if !scope.started {
            return;
        }
        if let Err(err) = run_hooks(&scope.after_all) {
            let mut path = self.path();
            path.extend(scope.name);
            warn!("afterAll hook failed in '{}': {err}", path.join(" > "));
            self.report.outcomes.push(TestOutcome {
                path,
                name: format!("{} hook", HookSlot::AfterAll),
                status: TestStatus::Failed(err),
            });
        }
    }
}

/// Run every hook, stopping at the first failure.
fn run_hooks(hooks: &[Hook]) -> Result<(), StepError> {
    hooks.iter().try_for_each(|hook| run_guarded(|| hook()))
}

impl TestHost for StdHost {
    fn describe(&mut self, name: &str, body: DescribeBody<'_>) -> Result<(), RunnerError> {
        self.scopes.push(Scope::named(name));
        let result = body(self);
        if let Some(scope) = self.scopes.pop() {
            self.close(scope);
        }
        result
    }

    fn test(&mut self, name: &str, body: TestBody) -> Result<(), RunnerError> {
        let status = TestStatus::from_result(self.run_test(body));
        let path = self.path();
        match &status {
            TestStatus::Passed => info!("{} > {name}: passed", path.join(" > ")),
            TestStatus::Failed(err) => warn!("{} > {name}: {err}", path.join(" > ")),
        }
        self.report.outcomes.push(TestOutcome {
            path,
            name: name.to_string(),
            status,
        });
        Ok(())
    }

    fn before_all(&mut self, hook: Hook) -> Result<(), RunnerError> {
        self.attach(HookSlot::BeforeAll, hook);
        Ok(())
    }

    fn after_all(&mut self, hook: Hook) -> Result<(), RunnerError> {
        self.attach(HookSlot::AfterAll, hook);
        Ok(())
    }

    fn before_each(&mut self, hook: Hook) -> Result<(), RunnerError> {
        self.attach(HookSlot::BeforeEach, hook);
        Ok(())
    }

    fn after_each(&mut self, hook: Hook) -> Result<(), RunnerError> {
        self.attach(HookSlot::AfterEach, hook);
        Ok(())
    }
}
