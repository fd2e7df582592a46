//! Feature documents consumed by the runner.
//!
//! Gherkin text is parsed with the `gherkin` crate and flattened into a
//! small document model: a feature holds scenarios, and a scenario holds
//! typed steps. Background steps are prepended to every scenario they
//! apply to, rules are flattened into the feature, and each Examples row of
//! a scenario outline becomes its own scenario with `<column>` placeholders
//! substituted. `And` and `But` steps arrive already resolved to the
//! preceding keyword.

use gherkin::GherkinEnv;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stepwise_patterns::StepType;

use crate::error::{FeatureParseError, RunnerError};

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDoc {
    /// Resolved step keyword.
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// Step text without the keyword.
    pub step: String,
}

/// A scenario and its steps, background included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDoc {
    /// Scenario name.
    pub scenario: String,
    /// Steps in execution order.
    pub steps: Vec<StepDoc>,
}

/// A parsed feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDoc {
    /// Feature name.
    pub feature: String,
    /// Scenarios in document order.
    pub scenarios: Vec<ScenarioDoc>,
}

/// Parse Gherkin text into feature documents.
///
/// # Errors
/// Returns [`FeatureParseError`] when the text is not valid Gherkin.
///
/// # Examples
/// ```
/// use stepwise::parse_feature_text;
///
/// let features = parse_feature_text(
///     "Feature: Cukes\n  Background:\n    Given a basket\n  Scenario: Eat\n    When I eat 1 cuke",
/// )
/// .expect("valid gherkin");
/// let steps: Vec<_> = features[0].scenarios[0]
///     .steps
///     .iter()
///     .map(|s| s.step.as_str())
///     .collect();
/// assert_eq!(steps, ["a basket", "I eat 1 cuke"]);
/// ```
pub fn parse_feature_text(text: &str) -> Result<Vec<FeatureDoc>, FeatureParseError> {
    let mut source = text.to_string();
    if !source.ends_with('\n') {
        source.push('\n');
    }
    let feature = gherkin::Feature::parse(source.as_str(), GherkinEnv::default())?;
    let doc = convert_feature(&feature)?;
    debug!(
        "parsed feature '{}' with {} scenarios",
        doc.feature,
        doc.scenarios.len()
    );
    Ok(vec![doc])
}

fn convert_feature(feature: &gherkin::Feature) -> Result<FeatureDoc, FeatureParseError> {
    let background = background_steps(feature.background.as_ref())?;
    let mut scenarios = Vec::new();
    for scenario in &feature.scenarios {
        scenarios.extend(expand_scenario(scenario, &background)?);
    }

    for rule in &feature.rules {
        let mut rule_background = background.clone();
        rule_background.extend(background_steps(rule.background.as_ref())?);
        for scenario in &rule.scenarios {
            scenarios.extend(expand_scenario(scenario, &rule_background)?);
        }
    }

    Ok(FeatureDoc {
        feature: feature.name.clone(),
        scenarios,
    })
}

fn background_steps(
    background: Option<&gherkin::Background>,
) -> Result<Vec<StepDoc>, FeatureParseError> {
    background.map_or_else(|| Ok(Vec::new()), |bg| convert_steps(&bg.steps))
}

fn convert_steps(steps: &[gherkin::Step]) -> Result<Vec<StepDoc>, FeatureParseError> {
    steps
        .iter()
        .map(|step| -> Result<StepDoc, FeatureParseError> {
            Ok(StepDoc {
                step_type: StepType::try_from(step.ty)?,
                step: step.value.clone(),
            })
        })
        .collect()
}

fn expand_scenario(
    scenario: &gherkin::Scenario,
    background: &[StepDoc],
) -> Result<Vec<ScenarioDoc>, FeatureParseError> {
    let mut steps = background.to_vec();
    steps.extend(convert_steps(&scenario.steps)?);

    let tables: Vec<&gherkin::Table> = scenario
        .examples
        .iter()
        .filter_map(|examples| examples.table.as_ref())
        .collect();
    if tables.is_empty() {
        return Ok(vec![ScenarioDoc {
            scenario: scenario.name.clone(),
            steps,
        }]);
    }

    let mut expanded = Vec::new();
    for table in tables {
        let Some((header, rows)) = table.rows.split_first() else {
            continue;
        };
        for row in rows {
            expanded.push(ScenarioDoc {
                scenario: format!(
                    "{} (example {})",
                    substitute(&scenario.name, header, row),
                    expanded.len() + 1
                ),
                steps: steps
                    .iter()
                    .map(|step| StepDoc {
                        step_type: step.step_type,
                        step: substitute(&step.step, header, row),
                    })
                    .collect(),
            });
        }
    }
    Ok(expanded)
}

fn substitute(text: &str, header: &[String], row: &[String]) -> String {
    header
        .iter()
        .zip(row)
        .fold(text.to_string(), |acc, (column, value)| {
            acc.replace(&format!("<{column}>"), value)
        })
}

/// Input accepted by [`Runner::run`](crate::Runner::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureInput {
    /// Gherkin text, parsed before running.
    Text(String),
    /// One parsed feature.
    Single(FeatureDoc),
    /// Several parsed features.
    Many(Vec<FeatureDoc>),
}

impl FeatureInput {
    /// Interpret a JSON value: a string is Gherkin text, an object is one
    /// feature document and an array is a list of them.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingFeatureText`] for any other JSON value
    /// and [`RunnerError::InvalidFeatureDocument`] when an object or array
    /// does not have the document shape.
    pub fn from_json(value: Value) -> Result<Self, RunnerError> {
        match value {
            Value::String(text) => Ok(Self::Text(text)),
            Value::Object(_) => Ok(Self::Single(serde_json::from_value(value)?)),
            Value::Array(_) => Ok(Self::Many(serde_json::from_value(value)?)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {
                Err(RunnerError::MissingFeatureText)
            }
        }
    }

    /// Resolve the input to feature documents, parsing text if necessary.
    ///
    /// # Errors
    /// Returns [`RunnerError::MissingFeatureText`] for blank text and
    /// [`RunnerError::FeatureParse`] for invalid Gherkin.
    pub fn into_features(self) -> Result<Vec<FeatureDoc>, RunnerError> {
        match self {
            Self::Text(text) if text.trim().is_empty() => Err(RunnerError::MissingFeatureText),
            Self::Text(text) => Ok(parse_feature_text(&text)?),
            Self::Single(doc) => Ok(vec![doc]),
            Self::Many(docs) => Ok(docs),
        }
    }
}

impl From<&str> for FeatureInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FeatureInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<FeatureDoc> for FeatureInput {
    fn from(value: FeatureDoc) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<FeatureDoc>> for FeatureInput {
    fn from(value: Vec<FeatureDoc>) -> Self {
        Self::Many(value)
    }
}
