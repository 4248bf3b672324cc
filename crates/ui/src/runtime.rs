use std::collections::VecDeque;
use std::path::PathBuf;

use services::StudyService;

use crate::controller::{Effect, ViewController, ViewEvent};

/// Executes task effects and reports their completion as events.
#[derive(Clone, Debug)]
pub struct EffectRunner {
    service: StudyService,
    export_dir: PathBuf,
}

impl EffectRunner {
    #[must_use]
    pub fn new(service: StudyService, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            export_dir: export_dir.into(),
        }
    }

    /// Runs one task effect. Feedback effects yield `None`.
    pub async fn run(&self, effect: Effect) -> Option<ViewEvent> {
        let event = match effect {
            Effect::FetchHistory { request, user } => {
                match self.service.list_sessions(&user).await {
                    Ok(sessions) => ViewEvent::HistoryLoaded { request, sessions },
                    Err(err) => ViewEvent::HistoryFailed {
                        request,
                        message: err.to_string(),
                    },
                }
            }
            Effect::ScheduleEmptyRedirect { request, delay } => {
                tokio::time::sleep(delay).await;
                ViewEvent::EmptyHistoryElapsed { request }
            }
            Effect::Generate { request, payload } => match self.service.generate(&payload).await {
                Ok(session) => ViewEvent::Generated {
                    request,
                    session: Box::new(session),
                },
                Err(err) => ViewEvent::GenerateFailed {
                    request,
                    message: err.to_string(),
                },
            },
            Effect::FetchSession {
                request,
                session,
                user,
            } => match self.service.resume(&session, &user).await {
                Ok(session) => ViewEvent::Resumed {
                    request,
                    session: Box::new(session),
                },
                Err(err) => ViewEvent::ResumeFailed {
                    request,
                    message: err.to_string(),
                },
            },
            Effect::SyncProgress {
                session,
                user,
                request,
            } => {
                let result = self
                    .service
                    .record_progress(&session, &user, &request)
                    .await
                    .map_err(|err| err.to_string());
                ViewEvent::ProgressSynced {
                    session,
                    request,
                    result,
                }
            }
            Effect::WriteExport {
                file_name,
                contents,
            } => ViewEvent::ExportFinished {
                result: self.write_export(&file_name, &contents).await,
            },
            Effect::Alert(_) | Effect::Notice(_) | Effect::Celebrate(_) => return None,
        };
        Some(event)
    }

    async fn write_export(&self, file_name: &str, contents: &str) -> Result<PathBuf, String> {
        let path = self.export_dir.join(file_name);
        let written = async {
            tokio::fs::create_dir_all(&self.export_dir).await?;
            tokio::fs::write(&path, contents).await
        }
        .await;
        match written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported study plan");
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "export failed");
                Err(err.to_string())
            }
        }
    }

    /// Dispatches `event`, then runs the resulting tasks one at a time,
    /// feeding each completion back until nothing is left. Returns the
    /// feedback effects in the order they were produced.
    pub async fn drive(&self, controller: &mut ViewController, event: ViewEvent) -> Vec<Effect> {
        let mut queue = VecDeque::from([event]);
        let mut feedback = Vec::new();
        while let Some(event) = queue.pop_front() {
            for effect in controller.dispatch(event).effects {
                if effect.is_feedback() {
                    feedback.push(effect);
                } else if let Some(next) = self.run(effect).await {
                    queue.push_back(next);
                }
            }
        }
        feedback
    }
}
