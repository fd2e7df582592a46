//! Smoke tests for the `stepwise` binary.

use std::fs;
use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

const STEPS: &str = r#"const { Given, Then } = require("cucumber")

Given(/I am on (\S+)$/, async url => {
  await page.goto(url)
})

Then("The word of the day is {word}", async word => {
  expect(word).toBe("test")
})
"#;

const FEATURE: &str = "\
Feature: Navigation
  Scenario: Visiting the home page
    Given I am on /home
    Then The word of the day is test
    Then the page title is Home
";

struct Project {
    dir: TempDir,
}

impl Project {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[fixture]
fn project() -> Project {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    for (name, contents) in [("steps.js", STEPS), ("navigation.feature", FEATURE)] {
        fs::write(dir.path().join(name), contents)
            .unwrap_or_else(|err| panic!("write {name}: {err}"));
    }
    Project { dir }
}

fn stepwise() -> Command {
    let mut cmd =
        Command::cargo_bin("stepwise").unwrap_or_else(|err| panic!("binary exists: {err}"));
    cmd.env_remove("STEPWISE_LOG_LEVEL").env_remove("STEPWISE_OUTPUT");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output()
        .unwrap_or_else(|err| panic!("stepwise should run: {err}"))
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json_of(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|err| panic!("stdout should be JSON: {err}"))
}

#[rstest]
fn extract_lists_definitions(project: Project) {
    let output = run(stepwise()
        .arg("extract")
        .arg(project.path("steps.js")));
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains(r"Given regex 'I am on (\S+)$'"));
    assert!(stdout.contains("Then expression 'The word of the day is {word}'"));
}

#[rstest]
fn match_prints_the_definition_and_arguments(project: Project) {
    let output = run(stepwise()
        .args(["match", "--steps"])
        .arg(project.path("steps.js"))
        .arg("I am on /home"));
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Given regex 'I am on (\\S+)$'\n  \"/home\"\n"
    );
}

#[rstest]
fn match_exits_non_zero_without_a_definition(project: Project) {
    let output = run(stepwise()
        .args(["match", "--type", "when", "--steps"])
        .arg(project.path("steps.js"))
        .arg("I am on /home"));
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).contains("no step definition matches"));
}

#[rstest]
fn check_reports_missing_steps_as_json(project: Project) {
    let output = run(stepwise()
        .args(["check", "--format", "json", "--steps"])
        .arg(project.path("steps.js"))
        .arg(project.path("navigation.feature")));
    assert_eq!(output.status.code(), Some(1));

    let report = json_of(&output);
    assert_eq!(report.get("passed"), Some(&json!(2)));
    assert_eq!(report.get("failed"), Some(&json!(1)));
    let failed_names: Vec<_> = report
        .get("outcomes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|o| o.get("passed") == Some(&json!(false)))
        .filter_map(|o| o.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(failed_names, ["Then the page title is Home"]);
}

#[rstest]
fn output_format_can_come_from_the_environment(project: Project) {
    let output = run(stepwise()
        .env("STEPWISE_OUTPUT", "json")
        .arg("extract")
        .arg(project.path("steps.js")));
    assert!(output.status.success());
    let files = json_of(&output);
    assert_eq!(files.as_array().map(Vec::len), Some(1));
}

#[test]
fn invalid_configuration_is_rejected() {
    let output = run(stepwise()
        .env("STEPWISE_LOG_LEVEL", "loud")
        .args(["extract", "steps.js"]));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown log level"));
}
