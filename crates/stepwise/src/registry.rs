//! Step registration and lookup.
//!
//! The registry keeps one list of compiled matchers per step type. Every
//! registration receives a sequence number, so lookups can honour
//! registration order both within a type and across types: the earliest
//! registered matching definition always wins.
//!
//! Registration requires `&mut self` and lookup only `&self`, so a registry
//! is populated first and then shared (typically behind an [`Arc`]) for the
//! duration of a run.
//!
//! [`Arc`]: std::sync::Arc

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use stepwise_patterns::{StepType, StepValue};

use crate::definition::Definition;
use crate::error::{StepError, StepPatternError};
use crate::matcher::{Matcher, StepPattern};

/// Handler invoked with the arguments extracted from matching step text.
pub type StepHandler = Arc<dyn Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync>;

struct StepEntry {
    sequence: usize,
    matcher: Matcher,
    handler: StepHandler,
}

/// Step definitions and their handlers, grouped by step type.
#[derive(Default)]
pub struct StepRegistry {
    steps: HashMap<StepType, Vec<StepEntry>>,
    next_sequence: usize,
}

impl std::fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRegistry")
            .field("definitions", &self.definitions())
            .finish()
    }
}

/// The outcome of a successful lookup: the matching definition, its handler
/// and the extracted arguments.
pub struct ResolvedStep<'r> {
    matcher: &'r Matcher,
    handler: &'r StepHandler,
    arguments: Vec<StepValue>,
}

impl ResolvedStep<'_> {
    /// The definition that matched.
    #[must_use]
    pub fn definition(&self) -> &Definition {
        self.matcher.definition()
    }

    /// Arguments extracted from the step text, in capture order.
    #[must_use]
    pub fn arguments(&self) -> &[StepValue] {
        &self.arguments
    }

    /// Call the handler with the extracted arguments.
    ///
    /// # Errors
    /// Propagates the handler's error.
    pub fn invoke(&self) -> Result<(), StepError> {
        (self.handler)(&self.arguments)
    }
}

impl std::fmt::Debug for ResolvedStep<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedStep")
            .field("definition", self.definition())
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `given` step.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when an expression pattern is malformed.
    ///
    /// # Examples
    /// ```
    /// use stepwise::StepRegistry;
    ///
    /// let mut steps = StepRegistry::new();
    /// steps
    ///     .given("I have {int} cukes", |_| Ok(()))
    ///     .expect("expression compiles");
    /// assert!(steps.resolve("I have 3 cukes").is_ok());
    /// ```
    pub fn given<P, F>(&mut self, pattern: P, handler: F) -> Result<&mut Self, StepPatternError>
    where
        P: Into<StepPattern>,
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register_pattern(StepType::Given, pattern, handler)
    }

    /// Register a `when` step.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when an expression pattern is malformed.
    pub fn when<P, F>(&mut self, pattern: P, handler: F) -> Result<&mut Self, StepPatternError>
    where
        P: Into<StepPattern>,
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register_pattern(StepType::When, pattern, handler)
    }

    /// Register a `then` step.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when an expression pattern is malformed.
    pub fn then<P, F>(&mut self, pattern: P, handler: F) -> Result<&mut Self, StepPatternError>
    where
        P: Into<StepPattern>,
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        self.register_pattern(StepType::Then, pattern, handler)
    }

    fn register_pattern<P, F>(
        &mut self,
        step_type: StepType,
        pattern: P,
        handler: F,
    ) -> Result<&mut Self, StepPatternError>
    where
        P: Into<StepPattern>,
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        let matcher = Matcher::from_pattern(step_type, pattern)?;
        Ok(self.register(step_type, matcher, handler))
    }

    /// Compile `definition` and register it under its own step type.
    ///
    /// # Errors
    /// Returns [`StepPatternError`] when the pattern fails to compile.
    pub fn register_definition<F>(
        &mut self,
        definition: Definition,
        handler: F,
    ) -> Result<&mut Self, StepPatternError>
    where
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        let step_type = definition.step_type;
        let matcher = Matcher::compile(definition)?;
        Ok(self.register(step_type, matcher, handler))
    }

    /// Register a compiled matcher under `step_type`.
    ///
    /// The matcher's definition is re-tagged with `step_type` so lookups and
    /// listings agree on where it lives.
    pub fn register<F>(&mut self, step_type: StepType, mut matcher: Matcher, handler: F) -> &mut Self
    where
        F: Fn(&[StepValue]) -> Result<(), StepError> + Send + Sync + 'static,
    {
        matcher.retag(step_type);
        debug!(
            "registered {step_type} step '{}'",
            matcher.definition().raw_pattern
        );
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.steps.entry(step_type).or_default().push(StepEntry {
            sequence,
            matcher,
            handler: Arc::new(handler),
        });
        self
    }

    /// Find the earliest registered definition of any type matching `text`.
    ///
    /// # Errors
    /// Returns [`StepError::NoMatchingStep`] when nothing matches.
    pub fn resolve(&self, text: &str) -> Result<ResolvedStep<'_>, StepError> {
        StepType::ALL
            .into_iter()
            .filter_map(|step_type| self.first_match(step_type, text))
            .min_by_key(|(entry, _)| entry.sequence)
            .map(|(entry, arguments)| Self::resolved(entry, arguments))
            .ok_or_else(|| no_match(None, text))
    }

    /// Find the earliest registered definition of `step_type` matching
    /// `text`.
    ///
    /// # Errors
    /// Returns [`StepError::NoMatchingStep`] when nothing of that type
    /// matches.
    pub fn resolve_typed(
        &self,
        step_type: StepType,
        text: &str,
    ) -> Result<ResolvedStep<'_>, StepError> {
        self.first_match(step_type, text)
            .map(|(entry, arguments)| Self::resolved(entry, arguments))
            .ok_or_else(|| no_match(Some(step_type), text))
    }

    fn first_match(&self, step_type: StepType, text: &str) -> Option<(&StepEntry, Vec<StepValue>)> {
        self.steps
            .get(&step_type)?
            .iter()
            .find_map(|entry| entry.matcher.test(text).map(|arguments| (entry, arguments)))
    }

    fn resolved(entry: &StepEntry, arguments: Vec<StepValue>) -> ResolvedStep<'_> {
        debug!(
            "resolved step to {} '{}'",
            entry.matcher.step_type(),
            entry.matcher.definition().raw_pattern
        );
        ResolvedStep {
            matcher: &entry.matcher,
            handler: &entry.handler,
            arguments,
        }
    }

    /// Matchers registered under `step_type`, in registration order.
    pub fn steps_for(&self, step_type: StepType) -> impl Iterator<Item = &Matcher> {
        self.steps
            .get(&step_type)
            .into_iter()
            .flatten()
            .map(|entry| &entry.matcher)
    }

    /// Every registered definition, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<&Definition> {
        let mut entries: Vec<&StepEntry> = self.steps.values().flatten().collect();
        entries.sort_by_key(|entry| entry.sequence);
        entries
            .into_iter()
            .map(|entry| entry.matcher.definition())
            .collect()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    /// Whether no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn no_match(step_type: Option<StepType>, text: &str) -> StepError {
    debug!("no step definition matches '{text}'");
    StepError::NoMatchingStep {
        step_type,
        text: text.to_string(),
    }
}
