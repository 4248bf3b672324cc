use dioxus::prelude::*;

use crate::controller::Celebration;
use crate::views::{Driver, FeedbackKind};

#[component]
pub fn FeedbackBar() -> Element {
    let driver = use_context::<Driver>();
    let banners: Vec<(u64, &'static str, String, &'static str)> = driver
        .feedback()
        .read()
        .items()
        .iter()
        .filter_map(|item| match &item.kind {
            FeedbackKind::Alert(message) => {
                Some((item.id, "feedback alert", message.clone(), "Dismiss"))
            }
            FeedbackKind::Notice(message) => {
                Some((item.id, "feedback notice", message.clone(), "OK"))
            }
            FeedbackKind::Celebrate(_) => None,
        })
        .collect();

    rsx! {
        div { class: "feedback-bar",
            for (id, class, message, dismiss) in banners {
                div { key: "{id}", class: "{class}",
                    span { "{message}" }
                    button {
                        class: "feedback-dismiss",
                        onclick: move |_| driver.dismiss(id),
                        "{dismiss}"
                    }
                }
            }
        }
    }
}

/// Short-lived overlay for completed topics and finished plans.
#[component]
pub fn CelebrationOverlay() -> Element {
    let driver = use_context::<Driver>();
    let current = driver
        .feedback()
        .read()
        .items()
        .iter()
        .rev()
        .find_map(|item| match &item.kind {
            FeedbackKind::Celebrate(celebration) => Some(celebration.clone()),
            _ => None,
        });

    let Some(celebration) = current else {
        return rsx! {};
    };
    let (class, text) = match celebration {
        Celebration::Topic(_) => ("celebration", "🎉"),
        Celebration::AllComplete => ("celebration all-complete", "🎊 All Done! 🎊"),
    };
    rsx! {
        div { class: "{class}", "{text}" }
    }
}
