use dioxus::prelude::*;
use services::{SaveOutcome, SessionReport};
use survey_core::ScoreReport;
use survey_core::model::Rating;

use super::done::DonePanel;
use super::test_harness::{TEST_TOPIC, setup_survey_harness};
use crate::vm::{ReportVm, SurveyIntent, map_report};

fn r(value: f64) -> Rating {
    Rating::new(value).unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn init_view_renders_starting_slider() {
    let mut harness = setup_survey_harness(2, 0);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains(TEST_TOPIC), "missing topic in {html}");
    assert!(html.contains("starting-rating"), "missing slider in {html}");
    assert!(html.contains("50.0"), "missing default value in {html}");
    assert!(html.contains("Begin"), "missing begin button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn begin_shows_first_story() {
    let mut harness = setup_survey_harness(2, 0);
    harness.rebuild();

    harness.dispatch(SurveyIntent::Begin(r(40.0)));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Story 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Headline"), "missing headline in {html}");
    assert!(html.contains("40.0"), "missing carried default in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn full_run_reaches_report_and_saves() {
    let mut harness = setup_survey_harness(2, 0);
    harness.rebuild();

    harness.dispatch(SurveyIntent::Begin(r(50.0)));
    harness.drive_async().await;
    harness.dispatch(SurveyIntent::Next(r(75.0)));
    harness.drive_async().await;
    harness.dispatch(SurveyIntent::Next(r(75.0)));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Level 1: Flip-Flopper"), "missing level in {html}");
    assert!(html.contains("Responses saved (2 rows)."), "missing save status in {html}");
    assert!(html.contains("Export CSV"), "missing export button in {html}");
    assert_eq!(harness.store.rows().unwrap().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_failure_stays_on_start_screen() {
    let mut harness = setup_survey_harness(2, 1);
    harness.rebuild();

    harness.dispatch(SurveyIntent::Begin(r(50.0)));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Could not load stories"), "missing error in {html}");
    assert!(html.contains("survey-begin"), "missing begin button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_begin_keeps_chosen_starting_score_for_retry() {
    let mut harness = setup_survey_harness(2, 1);
    harness.rebuild();
    harness.set_starting(r(63.5));

    harness.press_begin();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Could not load stories"), "missing error in {html}");
    assert!(html.contains("63.5"), "starting score was reset in {html}");
    assert!(!html.contains("50.0"), "slider fell back to default in {html}");

    harness.press_begin();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Story 1 of 2"), "retry did not start survey in {html}");
    assert!(html.contains("63.5"), "missing carried starting score in {html}");
    assert!(!html.contains("Could not load stories"), "stale error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_fetch_goes_to_report() {
    let mut harness = setup_survey_harness(0, 0);
    harness.rebuild();

    harness.dispatch(SurveyIntent::Begin(r(90.0)));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Buttigieg Stan"), "missing level in {html}");
    assert!(html.contains("n/a"), "missing empty final rating in {html}");
}

#[component]
fn DonePanelHarness(report: ReportVm) -> Element {
    rsx! {
        DonePanel { report, on_export: move |()| {} }
    }
}

#[test]
fn done_panel_marks_failed_save() {
    let report = map_report(&SessionReport {
        score: ScoreReport::from_responses(r(50.0), &[r(55.0)]),
        rows: Vec::new(),
        save: SaveOutcome::Failed {
            reason: "status 401".into(),
        },
    });
    let mut dom = VirtualDom::new_with_props(DonePanelHarness, DonePanelHarnessProps { report });
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("save-status--failed"), "missing failure class in {html}");
    assert!(html.contains("status 401"), "missing reason in {html}");
}
