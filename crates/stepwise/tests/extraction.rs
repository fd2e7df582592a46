//! Extracting definitions from step source and registering them.

mod common;

use common::{noop, read_fixture};
use rstest::rstest;
use stepwise::{StepRegistry, StepType, StepValue, Variant, extract_definitions};

#[test]
fn extracts_definitions_from_step_source() {
    let source = read_fixture("fixtures/steps.js");
    let found = extract_definitions(&source);
    assert!(found.diagnostics.is_empty(), "{:?}", found.diagnostics);

    let summary: Vec<_> = found
        .definitions
        .iter()
        .map(|def| (def.step_type, def.raw_pattern.as_str(), def.variant))
        .collect();
    assert_eq!(
        summary,
        vec![
            (StepType::Given, r"I am on (\S+)$", Variant::Regex),
            (
                StepType::Then,
                "The word of the day is {word}",
                Variant::Expression
            ),
        ]
    );

    let snippets: Vec<_> = found.definitions.iter().map(|d| d.snippet.as_str()).collect();
    assert_eq!(
        snippets,
        vec![
            "Given(/I am on (\\S+)$/, async url => {\n  const page = await getPage()\n  await page.goto(url)\n})",
            "Then(\"The word of the day is {word}\", async word => {\n  expect(word).toBe(\"test\")\n})",
        ]
    );
}

#[test]
fn extracted_definitions_resolve_step_text() {
    let source = read_fixture("fixtures/steps.js");
    let mut steps = StepRegistry::new();
    for definition in extract_definitions(&source).definitions {
        steps
            .register_definition(definition, noop)
            .unwrap_or_else(|err| panic!("extracted pattern should compile: {err}"));
    }

    let on_page = steps
        .resolve("I am on /home")
        .unwrap_or_else(|err| panic!("regex definition should match: {err}"));
    assert_eq!(on_page.definition().step_type, StepType::Given);
    assert_eq!(on_page.arguments(), [StepValue::from("/home")]);

    let word = steps
        .resolve_typed(StepType::Then, "The word of the day is test")
        .unwrap_or_else(|err| panic!("expression definition should match: {err}"));
    assert_eq!(word.arguments(), [StepValue::from("test")]);
}

#[test]
fn skipped_registrations_do_not_hide_later_ones() {
    let source = "\
Given(pattern, () => {})
When(`I press ${key}`, () => {})
Then('the {word} light is on', colour => {})
";
    let found = extract_definitions(source);
    let lines: Vec<_> = found.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2]);
    assert_eq!(found.definitions.len(), 1);
}

#[rstest]
#[case::quote_in_regex("const QUOTE = /\"/\n")]
#[case::apostrophe_in_regex("const re = /it's/\n")]
#[case::keyword_in_regex("const re = /Given(x)/\n")]
#[case::unclosed_apostrophe("const label = 'it\n")]
#[case::unclosed_quote("log(\"oops)\n")]
fn top_level_literals_do_not_swallow_registrations(#[case] preamble: &str) {
    let source = format!("{preamble}Given('a step', () => {{}})\nThen('another', () => {{}})\n");
    let found = extract_definitions(&source);
    assert!(found.diagnostics.is_empty(), "{:?}", found.diagnostics);
    let patterns: Vec<_> = found
        .definitions
        .iter()
        .map(|def| (def.step_type, def.raw_pattern.as_str()))
        .collect();
    assert_eq!(
        patterns,
        vec![(StepType::Given, "a step"), (StepType::Then, "another")]
    );
}

#[test]
fn division_is_not_read_as_a_regex() {
    let source = "const half = total / 2\nGiven('a step', () => {})\nconst third = total / 3\n";
    let found = extract_definitions(source);
    assert_eq!(found.definitions.len(), 1);
    assert!(found.diagnostics.is_empty());
}
