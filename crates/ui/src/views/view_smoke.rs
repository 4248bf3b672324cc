use study_core::model::{PlanEntry, PlanForm, StudyPlan, UserId};

use super::test_harness::ViewHarness;
use crate::controller::{Effect, ViewEvent};

fn form() -> PlanForm {
    PlanForm {
        user_id: "ada".into(),
        syllabus: "Graph theory".into(),
        days: "2".into(),
        difficulty: "beginner".into(),
    }
}

/// The opening tag of the generate button.
fn submit_button(html: &str) -> &str {
    let start = html.find("id=\"generate-btn\"").expect("generate button");
    let end = html[start..].find('>').map_or(html.len(), |offset| start + offset);
    &html[start..end]
}

async fn generated(harness: &mut ViewHarness) {
    harness.drive(ViewEvent::NewSession).await;
    harness.drive(ViewEvent::Submit(form())).await;
}

#[tokio::test(flavor = "current_thread")]
async fn user_select_is_the_first_panel() {
    let harness = ViewHarness::new();
    let html = harness.render();
    assert!(html.contains("View my sessions"), "missing button in {html}");
    assert!(!html.contains("sessions-list"), "history leaked into {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_panel_lists_session_cards() {
    let mut harness = ViewHarness::new();
    let plan: StudyPlan = vec![
        PlanEntry::new(1, "09:00 - 10:00", "Paths"),
        PlanEntry::new(2, "09:00 - 10:00", "Cycles"),
    ]
    .into();
    let ada = UserId::new("ada").expect("user id");
    harness.api.seed_session(&ada, "Graphs", &plan).expect("seed");

    harness
        .drive(ViewEvent::LoadHistory { user: "ada".into() })
        .await;
    let html = harness.render();
    assert!(html.contains("Graphs"), "missing title in {html}");
    assert!(html.contains("2 topics"), "missing topics in {html}");
    assert!(html.contains("0/2 completed (0%)"), "missing progress in {html}");
    assert!(html.contains("Resume"), "missing resume in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_history_shows_placeholder_before_redirect() {
    let mut harness = ViewHarness::new();
    let load = harness
        .controller
        .dispatch(ViewEvent::LoadHistory { user: "ada".into() });
    let Some(Effect::FetchHistory { request, .. }) = load.effects.first().cloned() else {
        panic!("expected a history fetch, got {:?}", load.effects);
    };
    harness.controller.dispatch(ViewEvent::HistoryLoaded {
        request,
        sessions: Vec::new(),
    });

    let html = harness.render();
    assert!(html.contains("No Previous Sessions Found"), "missing placeholder in {html}");
    assert!(html.contains("Start your first study session below!"));
}

#[tokio::test(flavor = "current_thread")]
async fn loading_panel_names_the_pending_work() {
    let mut harness = ViewHarness::new();
    harness.controller.dispatch(ViewEvent::NewSession);
    harness.controller.dispatch(ViewEvent::Submit(form()));

    let html = harness.render();
    assert!(
        html.contains("Generating your personalized study plan..."),
        "missing loading text in {html}"
    );
    assert!(html.contains("study-form"), "form unmounted while generating: {html}");
    assert!(submit_button(&html).contains("disabled"), "submit enabled in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn form_submit_is_enabled_while_editing() {
    let mut harness = ViewHarness::new();
    harness.controller.dispatch(ViewEvent::NewSession);

    let html = harness.render();
    assert!(!submit_button(&html).contains("disabled"), "submit disabled in {html}");
    assert!(!html.contains("spinner"));
}

#[tokio::test(flavor = "current_thread")]
async fn results_panel_renders_plan_notes_and_metrics() {
    let mut harness = ViewHarness::new();
    generated(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("ada_20231114_221320"), "missing session id in {html}");
    assert!(html.contains("notes/ada_20231114_221320.md"));
    assert!(html.contains("Day 1 Schedule"));
    assert!(html.contains("Day 2 Schedule"));
    assert!(html.contains("Graph theory: lesson 1"));
    assert!(html.contains("1-2 hrs"));
    assert!(html.contains("Key ideas to review."));
    assert!(html.contains("StudyPlanAgent"));
    assert!(html.contains("Total Processing Time: 2.00s"));
    assert!(html.contains("0%"));
}

#[tokio::test(flavor = "current_thread")]
async fn checked_topics_render_as_completed() {
    let mut harness = ViewHarness::new();
    generated(&mut harness).await;
    harness
        .drive(ViewEvent::ToggleTopic("Graph theory: lesson 1".into()))
        .await;

    let html = harness.render();
    assert!(html.contains("topic-item completed"), "missing completed row in {html}");
    assert!(html.contains("25%"), "missing percentage in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn resumed_sessions_have_no_metrics() {
    let mut harness = ViewHarness::new();
    let plan: StudyPlan = vec![PlanEntry::new(1, "09:00", "Paths")].into();
    let ada = UserId::new("ada").expect("user id");
    let id = harness.api.seed_session(&ada, "Graphs", &plan).expect("seed");

    harness
        .drive(ViewEvent::LoadHistory { user: "ada".into() })
        .await;
    harness.drive(ViewEvent::ResumeSelected(id)).await;

    let html = harness.render();
    assert!(html.contains("No metrics available"), "missing metrics placeholder in {html}");
    assert!(html.contains("N/A"), "missing notes file placeholder in {html}");
}
