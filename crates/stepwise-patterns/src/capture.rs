//! Argument extraction for regular-expression step definitions.

use regex::Regex;

use crate::parameter::StepValue;

/// Search `text` for `re` and return every capture group as a
/// [`StepValue::Str`], or `None` when there is no match.
///
/// The search is unanchored unless the pattern anchors itself. Groups that
/// do not take part in the match yield an empty string, so argument
/// positions always follow the group numbering.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use stepwise_patterns::{StepValue, capture_text_arguments};
/// let regex = Regex::new(r"I am on (\S+)$").expect("regex compiles");
/// assert_eq!(
///     capture_text_arguments(&regex, "Given I am on /home"),
///     Some(vec![StepValue::from("/home")])
/// );
/// assert_eq!(capture_text_arguments(&regex, "I am lost"), None);
/// ```
#[must_use]
pub fn capture_text_arguments(re: &Regex, text: &str) -> Option<Vec<StepValue>> {
    let caps = re.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|group| StepValue::Str(group.map_or_else(String::new, |m| m.as_str().to_owned())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[expect(clippy::expect_used, reason = "test patterns are literals")]
    fn regex(source: &str) -> Regex {
        Regex::new(source).expect("test regex must compile")
    }

    #[rstest]
    #[case(r"^(\d+)$", "nope")]
    #[case(r"^exact$", "not exact")]
    fn misses_yield_none(#[case] pattern: &str, #[case] text: &str) {
        assert_eq!(capture_text_arguments(&regex(pattern), text), None);
    }

    #[test]
    fn digits_stay_text() {
        let values = capture_text_arguments(&regex(r"on (\S+) at (\d+)"), "I am on /home at 9 today");
        assert_eq!(
            values,
            Some(vec![StepValue::from("/home"), StepValue::from("9")])
        );
    }

    #[test]
    fn patterns_without_groups_yield_no_arguments() {
        assert_eq!(
            capture_text_arguments(&regex("plain"), "plain text"),
            Some(vec![])
        );
    }

    #[test]
    fn skipped_groups_keep_their_slot() {
        let values = capture_text_arguments(&regex(r"^(a)?(b)?$"), "a");
        assert_eq!(values, Some(vec![StepValue::from("a"), StepValue::from("")]));
    }
}
