//! Lifecycle hook storage.
//!
//! The registry holds at most one callback per [`HookSlot`]. Registering a
//! slot again replaces the previous callback, and an empty slot yields a
//! no-op so callers never need to check before running a hook.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;

use crate::error::{HookError, StepError};

/// A lifecycle callback.
pub type Hook = Arc<dyn Fn() -> Result<(), StepError> + Send + Sync>;

/// The four lifecycle points a hook may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookSlot {
    /// Once per feature, before its first test.
    BeforeAll,
    /// Once per feature, after its last test.
    AfterAll,
    /// Before every test.
    BeforeEach,
    /// After every test.
    AfterEach,
}

impl HookSlot {
    /// Every slot.
    pub const ALL: [Self; 4] = [
        Self::BeforeAll,
        Self::AfterAll,
        Self::BeforeEach,
        Self::AfterEach,
    ];

    /// The camel-case slot name, e.g. `beforeAll`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "beforeAll",
            Self::AfterAll => "afterAll",
            Self::BeforeEach => "beforeEach",
            Self::AfterEach => "afterEach",
        }
    }
}

impl fmt::Display for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookSlot {
    type Err = HookError;

    /// Parse an exact camel-case slot name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == name)
            .ok_or_else(|| HookError::InvalidHookType(name.to_string()))
    }
}

fn noop() -> Hook {
    Arc::new(|| Ok(()))
}

/// One optional callback per lifecycle slot.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: HashMap<HookSlot, Hook>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<_> = self.hooks.keys().map(|slot| slot.as_str()).collect();
        registered.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("registered", &registered)
            .finish()
    }
}

impl HookRegistry {
    /// Create a registry with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `beforeAll` hook.
    pub fn before_all<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(HookSlot::BeforeAll, hook)
    }

    /// Set the `afterAll` hook.
    pub fn after_all<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(HookSlot::AfterAll, hook)
    }

    /// Set the `beforeEach` hook.
    pub fn before_each<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(HookSlot::BeforeEach, hook)
    }

    /// Set the `afterEach` hook.
    pub fn after_each<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register(HookSlot::AfterEach, hook)
    }

    /// Set the hook for `slot`, replacing any earlier one.
    pub fn register<F>(&mut self, slot: HookSlot, hook: F) -> &mut Self
    where
        F: Fn() -> Result<(), StepError> + Send + Sync + 'static,
    {
        if self.hooks.insert(slot, Arc::new(hook)).is_some() {
            debug!("replaced {slot} hook");
        }
        self
    }

    /// Whether a hook has been set for `slot`.
    #[must_use]
    pub fn is_registered(&self, slot: HookSlot) -> bool {
        self.hooks.contains_key(&slot)
    }

    /// The hook for `slot`, or a no-op when none was set.
    #[must_use]
    pub fn get_registered(&self, slot: HookSlot) -> Hook {
        self.hooks.get(&slot).map_or_else(noop, Arc::clone)
    }

    /// Look a hook up by its camel-case slot name.
    ///
    /// # Errors
    /// Returns [`HookError::InvalidHookType`] when `name` is not a slot name.
    ///
    /// # Examples
    /// ```
    /// use stepwise::HookRegistry;
    ///
    /// let hooks = HookRegistry::new();
    /// let hook = hooks.get_registered_by_name("beforeEach").expect("valid slot");
    /// assert!(hook().is_ok());
    /// assert!(hooks.get_registered_by_name("beforeSome").is_err());
    /// ```
    pub fn get_registered_by_name(&self, name: &str) -> Result<Hook, HookError> {
        let slot = name.parse::<HookSlot>()?;
        Ok(self.get_registered(slot))
    }
}
