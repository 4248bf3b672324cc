use dioxus::prelude::*;
use study_core::model::{Difficulty, PlanForm};

use crate::controller::ViewEvent;
use crate::views::Driver;

#[component]
pub fn PlanFormPanel() -> Element {
    let driver = use_context::<Driver>();
    let (initial, disabled, has_user) = {
        let controller = driver.controller();
        let controller = controller.read();
        let mut form = controller.form().clone();
        if form.user_id.trim().is_empty()
            && let Some(context) = controller.context()
        {
            form.user_id = context.user.to_string();
        }
        if form.difficulty.trim().is_empty() {
            form.difficulty = Difficulty::Intermediate.as_str().to_string();
        }
        (form, controller.is_submit_disabled(), controller.context().is_some())
    };

    let mut user_id = use_signal(|| initial.user_id.clone());
    let mut syllabus = use_signal(|| initial.syllabus.clone());
    let mut days = use_signal(|| initial.days.clone());
    let mut difficulty = use_signal(|| initial.difficulty.clone());

    rsx! {
        section { class: "panel input", hidden: disabled,
            h2 { "Create a study plan" }
            form {
                id: "study-form",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    driver.send(ViewEvent::Submit(PlanForm {
                        user_id: user_id(),
                        syllabus: syllabus(),
                        days: days(),
                        difficulty: difficulty(),
                    }));
                },
                label { r#for: "user-id", "Your name" }
                input {
                    id: "user-id",
                    r#type: "text",
                    placeholder: "Leave blank to study anonymously",
                    value: "{user_id}",
                    oninput: move |evt| user_id.set(evt.value()),
                }
                label { r#for: "syllabus", "What do you want to learn?" }
                textarea {
                    id: "syllabus",
                    rows: "6",
                    placeholder: "Paste a syllabus or describe the topics",
                    value: "{syllabus}",
                    oninput: move |evt| syllabus.set(evt.value()),
                }
                div { class: "form-row",
                    div {
                        label { r#for: "days", "Number of days" }
                        input {
                            id: "days",
                            r#type: "number",
                            min: "1",
                            value: "{days}",
                            oninput: move |evt| days.set(evt.value()),
                        }
                    }
                    div {
                        label { r#for: "difficulty", "Difficulty" }
                        select {
                            id: "difficulty",
                            value: "{difficulty}",
                            onchange: move |evt| difficulty.set(evt.value()),
                            for level in Difficulty::ALL {
                                option {
                                    value: level.as_str(),
                                    selected: level.as_str() == difficulty.read().as_str(),
                                    "{level.label()}"
                                }
                            }
                        }
                    }
                }
                div { class: "panel-actions",
                    button {
                        id: "generate-btn",
                        r#type: "submit",
                        disabled: disabled,
                        "Generate study plan"
                    }
                    if has_user {
                        button {
                            class: "secondary",
                            r#type: "button",
                            onclick: move |_| driver.send(ViewEvent::BackToSessions),
                            "Back to sessions"
                        }
                    }
                }
            }
        }
    }
}
