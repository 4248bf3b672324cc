use dioxus::prelude::*;

use crate::controller::Panel;
use crate::views::{
    CelebrationOverlay, Driver, FeedbackBar, HistoryPanel, LoadingPanel, PlanFormPanel,
    ResultsPanel, UserSelectPanel,
};

/// Shows exactly one panel, the one the controller reports. The plan form
/// stays mounted, hidden, while its submission is generating.
#[component]
pub fn StudyShell() -> Element {
    let driver = use_context::<Driver>();
    let (panel, form_mounted) = {
        let controller = driver.controller();
        let controller = controller.read();
        (
            controller.panel(),
            controller.panel() == Panel::Input || controller.is_submit_disabled(),
        )
    };

    rsx! {
        div { class: "study-shell",
            header { class: "app-header",
                h1 { "AI Study Planner" }
                p { class: "subtitle", "Personalized study plans, notes and resources" }
            }
            FeedbackBar {}
            main {
                if form_mounted {
                    PlanFormPanel {}
                }
                match panel {
                    Panel::UserSelect => rsx! { UserSelectPanel {} },
                    Panel::History => rsx! { HistoryPanel {} },
                    Panel::Input => rsx! {},
                    Panel::Loading => rsx! { LoadingPanel {} },
                    Panel::Results => rsx! { ResultsPanel {} },
                }
            }
            CelebrationOverlay {}
        }
    }
}
