use dioxus::prelude::*;

use crate::controller::ViewEvent;
use crate::views::Driver;

#[component]
pub fn UserSelectPanel() -> Element {
    let driver = use_context::<Driver>();
    let mut name = use_signal(String::new);

    rsx! {
        section { class: "panel user-select",
            h2 { "Welcome back" }
            p { class: "hint", "Enter your name to see your previous study sessions." }
            form {
                class: "user-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    driver.send(ViewEvent::LoadHistory { user: name() });
                },
                input {
                    id: "user-id-check",
                    r#type: "text",
                    placeholder: "Your name",
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                button { id: "load-history-btn", r#type: "submit", "View my sessions" }
            }
        }
    }
}
