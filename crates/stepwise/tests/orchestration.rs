//! End-to-end runs of feature files through the in-process host.

mod common;

use std::sync::{Arc, Mutex};

use common::{noop, read_fixture};
use rstest::{fixture, rstest};
use serial_test::serial;
use stepwise::{
    HookRegistry, RunReport, Runner, RunnerError, StdHost, StepError, StepRegistry, StepValue,
    TestStatus,
};

static EVENTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record(event: impl Into<String>) {
    EVENTS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(event.into());
}

fn take_events() -> Vec<String> {
    std::mem::take(
        &mut *EVENTS
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner),
    )
}

fn int_arg(args: &[StepValue]) -> Result<i64, StepError> {
    args.first()
        .and_then(StepValue::as_int)
        .ok_or_else(|| StepError::failed("expected an integer argument"))
}

#[fixture]
fn basket_steps() -> Arc<StepRegistry> {
    let basket = Arc::new(Mutex::new(0_i64));
    let add = Arc::clone(&basket);
    let check = Arc::clone(&basket);
    let empty = Arc::clone(&basket);

    let mut steps = StepRegistry::new();
    steps
        .given("an empty basket", move |_| {
            record("empty");
            *empty.lock().map_err(StepError::failed)? = 0;
            Ok(())
        })
        .and_then(|steps| {
            steps.when("I add {int} cucumber(s)", move |args| {
                let count = int_arg(args)?;
                record(format!("add {count}"));
                *add.lock().map_err(StepError::failed)? += count;
                Ok(())
            })
        })
        .and_then(|steps| {
            steps.then("the basket holds {int} item(s)", move |args| {
                let expected = int_arg(args)?;
                let held = *check.lock().map_err(StepError::failed)?;
                if held == expected {
                    Ok(())
                } else {
                    Err(StepError::failed(format!("basket holds {held}, expected {expected}")))
                }
            })
        })
        .and_then(|steps| steps.when("I pay with a {string}", noop))
        .unwrap_or_else(|err| panic!("expressions should compile: {err}"));
    Arc::new(steps)
}

#[fixture]
fn recording_hooks() -> Arc<HookRegistry> {
    let mut hooks = HookRegistry::new();
    hooks
        .before_all(|| {
            record("beforeAll");
            Ok(())
        })
        .after_all(|| {
            record("afterAll");
            Ok(())
        })
        .before_each(|| {
            record("beforeEach");
            Ok(())
        });
    Arc::new(hooks)
}

fn run_basket(steps: Arc<StepRegistry>, hooks: Arc<HookRegistry>) -> RunReport {
    let runner = Runner::builder()
        .steps(steps)
        .hooks(hooks)
        .build()
        .unwrap_or_else(|err| panic!("runner should build: {err}"));
    let mut host = StdHost::new();
    runner
        .run(read_fixture("features/basket.feature"), &mut host)
        .unwrap_or_else(|err| panic!("feature should run: {err}"));
    host.finish()
}

#[rstest]
#[serial]
fn runs_every_step_as_a_named_test(
    basket_steps: Arc<StepRegistry>,
    recording_hooks: Arc<HookRegistry>,
) {
    take_events();
    let report = run_basket(basket_steps, recording_hooks);

    let names: Vec<_> = report
        .outcomes()
        .iter()
        .map(|o| format!("{} > {}", o.path.join(" > "), o.name))
        .collect();
    assert_eq!(
        names,
        vec![
            "Feature: Basket > Scenario: Adding cucumbers > Given an empty basket",
            "Feature: Basket > Scenario: Adding cucumbers > When I add 3 cucumbers",
            "Feature: Basket > Scenario: Adding cucumbers > Then the basket holds 3 items",
            "Feature: Basket > Scenario: Adding 1 cucumbers (example 1) > Given an empty basket",
            "Feature: Basket > Scenario: Adding 1 cucumbers (example 1) > When I add 1 cucumbers",
            "Feature: Basket > Scenario: Adding 1 cucumbers (example 1) > Then the basket holds 1 items",
            "Feature: Basket > Scenario: Adding 12 cucumbers (example 2) > Given an empty basket",
            "Feature: Basket > Scenario: Adding 12 cucumbers (example 2) > When I add 12 cucumbers",
            "Feature: Basket > Scenario: Adding 12 cucumbers (example 2) > Then the basket holds 12 items",
            "Feature: Basket > Scenario: Paying > Given an empty basket",
            "Feature: Basket > Scenario: Paying > When I pay with a \"gift card\"",
            "Feature: Basket > Scenario: Paying > Then a receipt is printed",
        ]
    );
}

#[rstest]
#[serial]
fn missing_steps_fail_only_their_own_test(
    basket_steps: Arc<StepRegistry>,
    recording_hooks: Arc<HookRegistry>,
) {
    take_events();
    let report = run_basket(basket_steps, recording_hooks);

    let failures: Vec<_> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failures, vec!["Then a receipt is printed"]);
    assert_eq!(report.passed(), report.outcomes().len() - 1);
    let Some(failure) = report.failures().next() else {
        panic!("expected one failure");
    };
    assert_eq!(
        failure.status,
        TestStatus::Failed(StepError::NoMatchingStep {
            step_type: None,
            text: "a receipt is printed".into(),
        })
    );
}

#[rstest]
#[serial]
fn hooks_wrap_the_feature(basket_steps: Arc<StepRegistry>, recording_hooks: Arc<HookRegistry>) {
    take_events();
    run_basket(basket_steps, recording_hooks);
    let events = take_events();

    assert_eq!(events.first().map(String::as_str), Some("beforeAll"));
    assert_eq!(events.last().map(String::as_str), Some("afterAll"));
    assert_eq!(events.iter().filter(|e| *e == "beforeAll").count(), 1);
    assert_eq!(events.iter().filter(|e| *e == "beforeEach").count(), 12);
    let adds: Vec<_> = events
        .iter()
        .filter(|e| e.starts_with("add "))
        .map(String::as_str)
        .collect();
    assert_eq!(adds, vec!["add 3", "add 1", "add 12"]);
}

#[test]
fn runner_requires_a_step_registry() {
    let result = Runner::builder()
        .hooks(Arc::new(HookRegistry::new()))
        .build();
    assert!(matches!(result, Err(RunnerError::MissingSteps)));
}

#[test]
fn invalid_gherkin_is_reported() {
    let runner = Runner::builder()
        .steps(Arc::new(StepRegistry::new()))
        .build()
        .unwrap_or_else(|err| panic!("runner should build: {err}"));
    let mut host = StdHost::new();
    let result = runner.run("not a feature", &mut host);
    assert!(matches!(result, Err(RunnerError::FeatureParse(_))));
    assert!(host.report().outcomes().is_empty());
}
