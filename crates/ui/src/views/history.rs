use dioxus::prelude::*;

use crate::controller::{HistoryStatus, ViewEvent};
use crate::views::Driver;
use crate::vm::{SessionCardVm, map_session_cards};

#[component]
pub fn HistoryPanel() -> Element {
    let driver = use_context::<Driver>();
    let (user, status) = {
        let controller = driver.controller();
        let controller = controller.read();
        let user = controller
            .context()
            .map(|context| context.user.to_string())
            .unwrap_or_default();
        (user, controller.history().clone())
    };

    rsx! {
        section { class: "panel history",
            div { class: "panel-header",
                h2 { "Your study sessions" }
                span { class: "current-user", "Signed in as {user}" }
            }
            div { class: "panel-actions",
                button {
                    id: "new-session-btn",
                    onclick: move |_| driver.send(ViewEvent::NewSession),
                    "New study session"
                }
                button {
                    class: "secondary",
                    onclick: move |_| driver.send(ViewEvent::ChangeUser),
                    "Change user"
                }
            }
            div { id: "sessions-list",
                match status {
                    HistoryStatus::Loading => rsx! {
                        div { class: "loading-history",
                            div { class: "spinner" }
                            p { "Loading your sessions..." }
                        }
                    },
                    HistoryStatus::Empty => rsx! {
                        div { class: "empty-sessions",
                            h3 { "No Previous Sessions Found" }
                            p { "Start your first study session below!" }
                        }
                    },
                    HistoryStatus::Ready(items) => rsx! {
                        for card in map_session_cards(&items) {
                            SessionCard { key: "{card.session_id}", card }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn SessionCard(card: SessionCardVm) -> Element {
    let driver = use_context::<Driver>();
    let session = card.session_id.clone();

    rsx! {
        div { class: "session-card-item",
            div { class: "session-header",
                div {
                    div { class: "session-title", "{card.title}" }
                    div { class: "session-date", "{card.date}" }
                }
                div { class: "session-badge", "{card.difficulty}" }
            }
            div { class: "session-details",
                span { class: "session-detail", "{card.topics_label}" }
                span { class: "session-detail", "{card.days_label}" }
            }
            div { class: "session-progress-bar",
                div {
                    class: "session-progress-fill",
                    style: "width: {card.progress_width}%",
                }
            }
            div { class: "session-footer",
                span { class: "session-progress-text", "{card.progress_label}" }
                button {
                    class: "session-resume-btn",
                    onclick: move |_| driver.send(ViewEvent::ResumeSelected(session.clone())),
                    "Resume"
                }
            }
        }
    }
}
