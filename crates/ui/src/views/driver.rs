use std::time::Duration;

use dioxus::prelude::*;

use crate::controller::{Celebration, Effect, ViewController, ViewEvent};
use crate::runtime::EffectRunner;

const CELEBRATION_TTL: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Alert(String),
    Notice(String),
    Celebrate(Celebration),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackItem {
    pub id: u64,
    pub kind: FeedbackKind,
}

/// Alerts, notices and celebrations waiting to be dismissed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackLog {
    items: Vec<FeedbackItem>,
    next_id: u64,
}

impl FeedbackLog {
    /// Records a feedback effect. Task effects are not feedback and return `None`.
    pub fn push(&mut self, effect: Effect) -> Option<u64> {
        let kind = match effect {
            Effect::Alert(message) => FeedbackKind::Alert(message),
            Effect::Notice(message) => FeedbackKind::Notice(message),
            Effect::Celebrate(celebration) => FeedbackKind::Celebrate(celebration),
            _ => return None,
        };
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(FeedbackItem { id, kind });
        Some(id)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|item| item.id != id);
    }

    #[must_use]
    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }
}

/// Shared handle that feeds events into the controller and runs their effects.
#[derive(Clone, Copy)]
pub struct Driver {
    controller: Signal<ViewController>,
    feedback: Signal<FeedbackLog>,
    runner: Signal<EffectRunner>,
}

impl Driver {
    #[must_use]
    pub fn controller(&self) -> Signal<ViewController> {
        self.controller
    }

    #[must_use]
    pub fn feedback(&self) -> Signal<FeedbackLog> {
        self.feedback
    }

    pub fn send(&self, event: ViewEvent) {
        let mut controller = self.controller;
        let transition = controller.write().dispatch(event);
        for effect in transition.effects {
            if effect.is_feedback() {
                self.show(effect);
                continue;
            }
            let driver = *self;
            let runner = self.runner.peek().clone();
            spawn(async move {
                if let Some(next) = runner.run(effect).await {
                    driver.send(next);
                }
            });
        }
    }

    pub fn dismiss(&self, id: u64) {
        let mut feedback = self.feedback;
        feedback.write().dismiss(id);
    }

    fn show(&self, effect: Effect) {
        let fades = matches!(effect, Effect::Celebrate(_));
        let mut feedback = self.feedback;
        let Some(id) = feedback.write().push(effect) else {
            return;
        };
        if fades {
            spawn(async move {
                tokio::time::sleep(CELEBRATION_TTL).await;
                feedback.write().dismiss(id);
            });
        }
    }
}

/// Creates the driver for this component tree and provides it as context.
pub fn use_driver(
    controller: impl FnOnce() -> ViewController,
    runner: impl FnOnce() -> EffectRunner,
) -> Driver {
    let controller = use_signal(controller);
    let feedback = use_signal(FeedbackLog::default);
    let runner = use_signal(runner);
    use_context_provider(|| Driver {
        controller,
        feedback,
        runner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_feedback_only() {
        let mut log = FeedbackLog::default();
        assert_eq!(log.push(Effect::Alert("a".into())), Some(0));
        assert_eq!(log.push(Effect::Celebrate(Celebration::AllComplete)), Some(1));
        assert_eq!(
            log.push(Effect::WriteExport {
                file_name: "x.md".into(),
                contents: String::new(),
            }),
            None
        );
        log.dismiss(0);
        assert_eq!(
            log.items(),
            &[FeedbackItem {
                id: 1,
                kind: FeedbackKind::Celebrate(Celebration::AllComplete),
            }]
        );
    }
}
