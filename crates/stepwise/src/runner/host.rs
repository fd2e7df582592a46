//! The test host contract the runner drives.

use crate::error::{RunnerError, StepError};
use crate::hooks::Hook;

/// A deferred test body handed to [`TestHost::test`].
///
/// # Examples
///
/// ```
/// use stepwise::TestBody;
///
/// let body = TestBody::new(|| Ok(()));
/// assert!(body.run().is_ok());
/// ```
pub struct TestBody {
    inner: Box<dyn FnOnce() -> Result<(), StepError> + Send>,
}

impl TestBody {
    /// Wrap a closure as a test body.
    #[must_use]
    pub fn new(inner: impl FnOnce() -> Result<(), StepError> + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Execute the wrapped closure.
    ///
    /// # Errors
    /// Propagates the closure's error.
    pub fn run(self) -> Result<(), StepError> {
        (self.inner)()
    }
}

impl std::fmt::Debug for TestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestBody").finish_non_exhaustive()
    }
}

/// Body of a [`TestHost::describe`] group; it receives the host back so it
/// can declare nested groups, tests and hooks.
pub type DescribeBody<'a> = &'a mut dyn FnMut(&mut dyn TestHost) -> Result<(), RunnerError>;

/// The test framework surface the runner emits groups, tests and hooks to.
///
/// Every method defaults to [`RunnerError::MissingTestMethod`], so a host
/// implements only what it supports and the runner fails clearly when it
/// needs something the host lacks.
pub trait TestHost {
    /// Declare a named group and run `body` inside it.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn describe(&mut self, name: &str, body: DescribeBody<'_>) -> Result<(), RunnerError> {
        let _ = (name, body);
        Err(RunnerError::MissingTestMethod { name: "describe" })
    }

    /// Declare a named test.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn test(&mut self, name: &str, body: TestBody) -> Result<(), RunnerError> {
        let _ = (name, body);
        Err(RunnerError::MissingTestMethod { name: "test" })
    }

    /// Attach a hook run once before the current group's first test.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn before_all(&mut self, hook: Hook) -> Result<(), RunnerError> {
        let _ = hook;
        Err(RunnerError::MissingTestMethod { name: "beforeAll" })
    }

    /// Attach a hook run once after the current group's last test.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn after_all(&mut self, hook: Hook) -> Result<(), RunnerError> {
        let _ = hook;
        Err(RunnerError::MissingTestMethod { name: "afterAll" })
    }

    /// Attach a hook run before every test in the current group.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn before_each(&mut self, hook: Hook) -> Result<(), RunnerError> {
        let _ = hook;
        Err(RunnerError::MissingTestMethod { name: "beforeEach" })
    }

    /// Attach a hook run after every test in the current group.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingTestMethod`] unless overridden.
    fn after_each(&mut self, hook: Hook) -> Result<(), RunnerError> {
        let _ = hook;
        Err(RunnerError::MissingTestMethod { name: "afterEach" })
    }
}
