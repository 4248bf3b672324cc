use dioxus::prelude::*;

use crate::controller::ViewEvent;
use crate::views::Driver;
use crate::vm::{
    ChecklistItemVm, DayScheduleVm, MetricsVm, NO_METRICS, NO_PLAN_DATA, PlanRowVm,
    ProgressStatsVm, map_checklist, map_metrics, map_plan, render_rich_text,
};

#[derive(Clone, Debug, PartialEq)]
struct ResultsData {
    session_id: String,
    notes_file: String,
    rows: Vec<PlanRowVm>,
    days: Vec<DayScheduleVm>,
    notes_html: String,
    resources_html: String,
    metrics: Option<MetricsVm>,
    checklist: Vec<ChecklistItemVm>,
    stats: ProgressStatsVm,
}

#[component]
pub fn ResultsPanel() -> Element {
    let driver = use_context::<Driver>();
    let data = {
        let controller = driver.controller();
        let controller = controller.read();
        controller.results().map(|results| {
            let session = results.session();
            let plan = map_plan(&session.plan);
            ResultsData {
                session_id: session.id.to_string(),
                notes_file: session.notes_file.clone(),
                rows: plan.rows,
                days: plan.days,
                notes_html: render_rich_text(&session.notes),
                resources_html: render_rich_text(&session.resources),
                metrics: map_metrics(&session.trace_summary),
                checklist: map_checklist(results.tracker()),
                stats: results.stats().into(),
            }
        })
    };
    let Some(data) = data else {
        return rsx! {};
    };

    rsx! {
        section { id: "results-section", class: "panel results",
            div { class: "panel-header",
                div { class: "session-info",
                    p { "Session ID: ", span { id: "session-id-display", "{data.session_id}" } }
                    p { "Notes file: ", span { id: "notes-file-display", "{data.notes_file}" } }
                }
                div { class: "panel-actions",
                    button {
                        id: "back-to-sessions-btn",
                        class: "secondary",
                        onclick: move |_| driver.send(ViewEvent::BackToSessions),
                        "Back to sessions"
                    }
                    button {
                        id: "export-btn",
                        onclick: move |_| driver.send(ViewEvent::Export),
                        "Export plan"
                    }
                }
            }

            ProgressSection { stats: data.stats, checklist: data.checklist }

            div { class: "card",
                h3 { "Study Plan" }
                PlanOverview { rows: data.rows }
            }

            div { id: "detailed-schedule", class: "card",
                h3 { "Detailed Schedule" }
                for day in data.days {
                    DaySchedule { key: "{day.day}", day }
                }
            }

            div { class: "card",
                h3 { "Study Notes" }
                div { id: "notes-content", class: "rich-text", dangerous_inner_html: "{data.notes_html}" }
            }

            div { class: "card",
                h3 { "Learning Resources" }
                div { id: "resources-content", class: "rich-text", dangerous_inner_html: "{data.resources_html}" }
            }

            div { id: "metrics-content", class: "card",
                h3 { "Processing Metrics" }
                Metrics { metrics: data.metrics }
            }
        }
    }
}

#[component]
fn ProgressSection(stats: ProgressStatsVm, checklist: Vec<ChecklistItemVm>) -> Element {
    let driver = use_context::<Driver>();
    let bar_label = stats.bar_label.clone().unwrap_or_default();

    rsx! {
        div { class: "card progress",
            div { class: "progress-header",
                h3 { "Your Progress" }
                button {
                    id: "refresh-progress-btn",
                    class: "secondary",
                    onclick: move |_| driver.send(ViewEvent::RefreshProgress),
                    "Refresh"
                }
            }
            div { class: "progress-stats",
                span { id: "completed-count", "{stats.completed}" }
                " completed · "
                span { id: "remaining-count", "{stats.remaining}" }
                " remaining · "
                span { id: "progress-percentage", "{stats.percentage_label}" }
            }
            div { class: "progress-bar",
                div {
                    id: "progress-bar-fill",
                    class: "progress-bar-fill",
                    style: "width: {stats.bar_width}%",
                    "{bar_label}"
                }
            }
            ul { id: "topics-checklist", class: "topics-checklist",
                for (index, item) in checklist.into_iter().enumerate() {
                    ChecklistRow { key: "{index}", item }
                }
            }
        }
    }
}

#[component]
fn ChecklistRow(item: ChecklistItemVm) -> Element {
    let driver = use_context::<Driver>();
    let class = match (item.completed, item.syncing) {
        (true, true) => "topic-item completed syncing",
        (true, false) => "topic-item completed",
        (false, true) => "topic-item syncing",
        (false, false) => "topic-item",
    };
    let topic = item.topic.clone();

    rsx! {
        li { class: "{class}",
            label {
                input {
                    r#type: "checkbox",
                    checked: item.completed,
                    onchange: move |_| driver.send(ViewEvent::ToggleTopic(topic.clone())),
                }
                span { class: "topic-name", "{item.topic}" }
            }
            span { class: "topic-slot", "{item.time_slot}" }
            span { class: "day-badge", "{item.day_badge}" }
        }
    }
}

#[component]
fn PlanOverview(rows: Vec<PlanRowVm>) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { id: "plan-overview", class: "empty", "{NO_PLAN_DATA}" }
        };
    }
    rsx! {
        table { id: "plan-overview", class: "plan-table",
            thead {
                tr {
                    th { "Day" }
                    th { "Time" }
                    th { "Topic" }
                    th { "Duration" }
                }
            }
            tbody {
                for (index, row) in rows.into_iter().enumerate() {
                    tr { key: "{index}",
                        td { "Day {row.day}" }
                        td { "{row.time_slot}" }
                        td { "{row.topic}" }
                        td { "{row.duration}" }
                    }
                }
            }
        }
    }
}

#[component]
fn DaySchedule(day: DayScheduleVm) -> Element {
    rsx! {
        div { class: "day-schedule",
            h4 { "{day.heading}" }
            for (index, card) in day.cards.into_iter().enumerate() {
                div { key: "{index}", class: "schedule-card",
                    div { class: "schedule-time", "{card.time_slot}" }
                    div { class: "schedule-topic", "{card.topic}" }
                    if let Some(description) = card.description {
                        p { class: "schedule-description", "{description}" }
                    }
                    if !card.activities.is_empty() {
                        ul { class: "schedule-activities",
                            for activity in card.activities {
                                li { "{activity}" }
                            }
                        }
                    }
                    if let Some(outcome) = card.expected_outcome {
                        p { class: "schedule-outcome",
                            strong { "Expected Outcome: " }
                            "{outcome}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Metrics(metrics: Option<MetricsVm>) -> Element {
    let Some(metrics) = metrics else {
        return rsx! {
            p { class: "empty", "{NO_METRICS}" }
        };
    };
    rsx! {
        table { class: "metrics-table",
            thead {
                tr {
                    th { "Agent" }
                    th { "Status" }
                    th { "Duration" }
                }
            }
            tbody {
                for (index, row) in metrics.rows.into_iter().enumerate() {
                    tr { key: "{index}",
                        td { "{row.agent}" }
                        td { class: "{row.status_class}", "{row.status}" }
                        td { "{row.duration}" }
                    }
                }
            }
        }
        p { class: "metrics-total", "Total Processing Time: {metrics.total_duration}" }
    }
}
