use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{StudyShell, use_driver};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    use_driver(|| ctx.controller(), || ctx.runner());

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Study Planner" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                StudyShell {}
            }
        }
    }
}
