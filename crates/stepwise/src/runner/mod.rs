//! Feature orchestration.
//!
//! [`Runner`] walks feature documents and declares, on a [`TestHost`], one
//! group per feature, one nested group per scenario and one test per step.
//! The four lifecycle hooks are attached inside every feature group. Each
//! test resolves its step text against the shared [`StepRegistry`] when the
//! host runs it, so an unmatched step fails that test only.

mod host;
mod std_host;

use std::sync::Arc;

use log::{debug, info};

use crate::error::RunnerError;
use crate::feature::{FeatureDoc, FeatureInput, ScenarioDoc, StepDoc};
use crate::hooks::{HookRegistry, HookSlot};
use crate::registry::StepRegistry;

pub use host::{DescribeBody, TestBody, TestHost};
pub use std_host::{RunReport, StdHost, TestOutcome, TestStatus};

/// Name of the group declared for a feature.
#[must_use]
pub fn feature_group_name(feature: &FeatureDoc) -> String {
    format!("Feature: {}", feature.feature)
}

/// Name of the group declared for a scenario.
#[must_use]
pub fn scenario_group_name(scenario: &ScenarioDoc) -> String {
    format!("Scenario: {}", scenario.scenario)
}

/// Name of the test declared for a step, e.g. `Given I have 3 cukes`.
#[must_use]
pub fn step_test_name(step: &StepDoc) -> String {
    format!("{} {}", step.step_type.display_name(), step.step)
}

/// Builder for [`Runner`].
#[derive(Debug, Default)]
pub struct RunnerBuilder {
    steps: Option<Arc<StepRegistry>>,
    hooks: Option<Arc<HookRegistry>>,
}

impl RunnerBuilder {
    /// Set the step registry. Required.
    #[must_use]
    pub fn steps(mut self, steps: Arc<StepRegistry>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the hook registry. Defaults to an empty registry.
    #[must_use]
    pub fn hooks(mut self, hooks: Arc<HookRegistry>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingSteps`] when no step registry was set.
    pub fn build(self) -> Result<Runner, RunnerError> {
        let steps = self.steps.ok_or(RunnerError::MissingSteps)?;
        let hooks = self.hooks.unwrap_or_default();
        Ok(Runner { steps, hooks })
    }
}

/// Declares features as groups and tests on a [`TestHost`].
#[derive(Debug, Clone)]
pub struct Runner {
    steps: Arc<StepRegistry>,
    hooks: Arc<HookRegistry>,
}

impl Runner {
    /// Start building a runner.
    #[must_use]
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::default()
    }

    /// The step registry tests resolve against.
    #[must_use]
    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    /// Declare every feature in `input` on `host`.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingFeatureText`] for blank or missing
    /// input, [`RunnerError::FeatureParse`] for invalid Gherkin, and any
    /// error the host reports, including
    /// [`RunnerError::MissingTestMethod`] for unsupported host methods.
    pub fn run(
        &self,
        input: impl Into<FeatureInput>,
        host: &mut dyn TestHost,
    ) -> Result<(), RunnerError> {
        let features = input.into().into_features()?;
        info!("running {} features", features.len());
        for feature in &features {
            self.run_feature(feature, host)?;
        }
        Ok(())
    }

    fn run_feature(&self, feature: &FeatureDoc, host: &mut dyn TestHost) -> Result<(), RunnerError> {
        debug!("declaring feature '{}'", feature.feature);
        host.describe(&feature_group_name(feature), &mut |host: &mut dyn TestHost| {
            host.before_all(self.hooks.get_registered(HookSlot::BeforeAll))?;
            host.after_all(self.hooks.get_registered(HookSlot::AfterAll))?;
            host.before_each(self.hooks.get_registered(HookSlot::BeforeEach))?;
            host.after_each(self.hooks.get_registered(HookSlot::AfterEach))?;
            for scenario in &feature.scenarios {
                self.run_scenario(scenario, host)?;
            }
            Ok(())
        })
    }

    fn run_scenario(
        &self,
        scenario: &ScenarioDoc,
        host: &mut dyn TestHost,
    ) -> Result<(), RunnerError> {
        host.describe(&scenario_group_name(scenario), &mut |host: &mut dyn TestHost| {
            for step in &scenario.steps {
                let steps = Arc::clone(&self.steps);
                let text = step.step.clone();
                host.test(
                    &step_test_name(step),
                    TestBody::new(move || steps.resolve(&text)?.invoke()),
                )?;
            }
            Ok(())
        })
    }
}
