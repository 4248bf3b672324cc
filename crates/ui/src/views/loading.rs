use dioxus::prelude::*;

use crate::views::Driver;

#[component]
pub fn LoadingPanel() -> Element {
    let driver = use_context::<Driver>();
    let message = driver
        .controller()
        .read()
        .loading_kind()
        .map_or("Loading...", |kind| kind.message());

    rsx! {
        section { id: "loading", class: "panel loading",
            div { class: "spinner" }
            p { "{message}" }
        }
    }
}
