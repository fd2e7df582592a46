//! The `Given`/`When`/`Then` keyword shared by definitions and features.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Keyword that files a step definition or feature step under one of the
/// three scenario phases.
///
/// Parsing ignores case and surrounding whitespace. [`Display`](fmt::Display)
/// writes the lower-case form used in diagnostics and documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepType {
    /// Arranges the state a scenario starts from.
    Given,
    /// The action under test.
    When,
    /// The observable outcome.
    Then,
}

impl StepType {
    /// The three keywords in registration-table order.
    pub const ALL: [Self; 3] = [Self::Given, Self::When, Self::Then];

    /// Lower-case keyword, e.g. `"given"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }

    /// Keyword as it prefixes a generated test name, e.g. `"Then"`.
    ///
    /// ```
    /// use stepwise_patterns::StepType;
    ///
    /// assert_eq!(StepType::Then.display_name(), "Then");
    /// assert_eq!(StepType::Then.to_string(), "then");
    /// ```
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text that names none of the three step keywords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid step type: {0} (expected given, when or then)")]
pub struct StepTypeParseError(pub String);

impl FromStr for StepType {
    type Err = StepTypeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let keyword = value.trim();
        match keyword.to_ascii_lowercase().as_str() {
            "given" => Ok(Self::Given),
            "when" => Ok(Self::When),
            "then" => Ok(Self::Then),
            _ => Err(StepTypeParseError(keyword.to_owned())),
        }
    }
}

/// A Gherkin keyword kind with no counterpart in [`StepType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported step type: {0:?}")]
pub struct UnsupportedStepType(pub gherkin::StepType);

impl TryFrom<gherkin::StepType> for StepType {
    type Error = UnsupportedStepType;

    fn try_from(ty: gherkin::StepType) -> Result<Self, Self::Error> {
        match ty {
            gherkin::StepType::Given => Ok(Self::Given),
            gherkin::StepType::When => Ok(Self::When),
            gherkin::StepType::Then => Ok(Self::Then),
            #[expect(unreachable_patterns, reason = "gherkin may add keyword kinds")]
            other => Err(UnsupportedStepType(other)),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::StepType;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

    impl Serialize for StepType {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    impl<'de> Deserialize<'de> for StepType {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            String::deserialize(deserializer)?
                .parse()
                .map_err(D::Error::custom)
        }
    }
}
