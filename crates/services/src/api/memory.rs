use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;

use study_core::Clock;
use study_core::model::{
    CompletionMarker, GenerateRequest, PlanEntry, ProgressAction, ProgressMap, ProgressSnapshot, SessionId,
    SessionListItem, StudyPlan, TraceEntry, TraceStatus, TraceSummary, UserId,
    completion_percentage, parse_stored_plan, sort_most_recent_first,
};
use study_core::time::{iso_timestamp, session_stamp};

use super::StudyApi;
use super::wire::{GeneratedPayload, ProgressAck, SessionPayload};
use crate::error::ApiError;

/// Backend call kinds, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    ListSessions,
    GetSession,
    Generate,
    UpdateProgress,
}

#[derive(Debug, Clone)]
struct StoredSession {
    user: UserId,
    created_at: String,
    last_updated: Option<String>,
    days: String,
    payload: SessionPayload,
}

#[derive(Default)]
struct State {
    clock: Clock,
    sessions: BTreeMap<SessionId, StoredSession>,
    failures: HashMap<ApiOperation, String>,
    progress_calls: Vec<(SessionId, String, ProgressAction)>,
}

/// In-process backend that behaves like the HTTP service.
///
/// Generated plans are deterministic so tests can assert on them.
#[derive(Clone, Default)]
pub struct InMemoryStudyApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryStudyApi {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                clock,
                ..State::default()
            })),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Unsuccessful(e.to_string()))
    }

    /// Stores a session as if it had been generated earlier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the store lock is poisoned.
    pub fn seed_session(
        &self,
        user: &UserId,
        syllabus: &str,
        plan: &StudyPlan,
    ) -> Result<SessionId, ApiError> {
        let study_plan =
            serde_json::to_value(plan).map_err(|e| ApiError::Unsuccessful(e.to_string()))?;
        self.seed_payload(
            user,
            SessionPayload {
                study_plan,
                syllabus: syllabus.to_string(),
                difficulty: "intermediate".into(),
                ..SessionPayload::default()
            },
        )
    }

    /// Stores a raw payload, e.g. one whose plan is still generator text.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the store lock is poisoned.
    pub fn seed_payload(
        &self,
        user: &UserId,
        mut payload: SessionPayload,
    ) -> Result<SessionId, ApiError> {
        let mut state = self.state()?;
        let now = state.clock.now();
        state.clock.advance(Duration::seconds(1));
        let id = SessionId::new(format!("{}_{}", user, session_stamp(now)))
            .map_err(|e| ApiError::Unsuccessful(e.to_string()))?;
        payload.user_id = Some(user.to_string());
        let days = parse_stored_plan(&payload.study_plan).day_count().to_string();
        state.sessions.insert(
            id.clone(),
            StoredSession {
                user: user.clone(),
                created_at: iso_timestamp(now),
                last_updated: None,
                days,
                payload,
            },
        );
        Ok(id)
    }

    /// Makes the next call of `operation` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the store lock is poisoned.
    pub fn fail_next(&self, operation: ApiOperation, message: &str) -> Result<(), ApiError> {
        self.state()?.failures.insert(operation, message.to_string());
        Ok(())
    }

    /// Progress updates received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the store lock is poisoned.
    pub fn progress_calls(&self) -> Result<Vec<(SessionId, String, ProgressAction)>, ApiError> {
        Ok(self.state()?.progress_calls.clone())
    }

    /// Stored progress of one session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the session is unknown or the lock is poisoned.
    pub fn stored_progress(&self, session: &SessionId) -> Result<ProgressMap, ApiError> {
        let state = self.state()?;
        state
            .sessions
            .get(session)
            .map(|stored| stored.payload.progress.clone())
            .ok_or_else(|| not_found(session))
    }
}

impl State {
    fn take_failure(&mut self, operation: ApiOperation) -> Result<(), ApiError> {
        match self.failures.remove(&operation) {
            Some(message) => Err(ApiError::Unsuccessful(message)),
            None => Ok(()),
        }
    }
}

fn not_found(session: &SessionId) -> ApiError {
    ApiError::Unsuccessful(format!("Session {session} not found"))
}

/// Topic count as the list endpoint reports it: a stored plan that is neither
/// a list nor plan text counts as empty.
fn listed_topic_count(study_plan: &Value) -> usize {
    match study_plan {
        Value::Array(_) | Value::String(_) => parse_stored_plan(study_plan).len(),
        _ => 0,
    }
}

fn list_item(id: &SessionId, stored: &StoredSession) -> SessionListItem {
    let total = listed_topic_count(&stored.payload.study_plan);
    let completed = stored.payload.progress.len();
    SessionListItem {
        session_id: id.clone(),
        syllabus: stored.payload.syllabus.clone(),
        difficulty: stored.payload.difficulty.clone(),
        total_topics: u32::try_from(total).unwrap_or(u32::MAX),
        days: stored.days.clone(),
        completion_percentage: completion_percentage(completed, total),
        completed_count: u32::try_from(completed).unwrap_or(u32::MAX),
        created_at: Some(stored.created_at.clone()),
        last_updated: Some(
            stored
                .last_updated
                .clone()
                .unwrap_or_else(|| stored.created_at.clone()),
        ),
    }
}

fn generated_plan(request: &GenerateRequest) -> StudyPlan {
    let subject = request.syllabus.lines().next().unwrap_or_default().trim();
    (1..=request.days)
        .flat_map(|day| {
            [
                PlanEntry::new(day, "09:00 - 10:30", format!("{subject}: lesson {day}"))
                    .with_description(format!("Work through lesson {day} of {subject}."))
                    .with_activities(["Read the material", "Summarize key ideas"])
                    .with_expected_outcome(format!("Explain lesson {day} in your own words.")),
                PlanEntry::new(day, "14:00", format!("{subject}: practice {day}"))
                    .with_activities(["Solve exercises"]),
            ]
        })
        .collect::<Vec<_>>()
        .into()
}

fn generated_trace() -> TraceSummary {
    let step = |agent: &str, function: &str, duration: f64| TraceEntry {
        agent: agent.to_string(),
        function: function.to_string(),
        status: TraceStatus::Success,
        duration: Some(duration),
        error: None,
    };
    let traces = vec![
        step("StudyPlanAgent", "generate_plan", 1.25),
        step("NotesAgent", "generate_notes", 0.5),
        step("ResourceAgent", "find_resources", 0.25),
    ];
    TraceSummary {
        total_traces: traces.len(),
        total_duration: 2.0,
        traces,
    }
}

#[async_trait]
impl StudyApi for InMemoryStudyApi {
    async fn list_sessions(&self, user: &UserId) -> Result<Vec<SessionListItem>, ApiError> {
        let mut state = self.state()?;
        state.take_failure(ApiOperation::ListSessions)?;
        let mut items: Vec<SessionListItem> = state
            .sessions
            .iter()
            .filter(|(_, stored)| &stored.user == user)
            .map(|(id, stored)| list_item(id, stored))
            .collect();
        sort_most_recent_first(&mut items);
        Ok(items)
    }

    async fn get_session(
        &self,
        session: &SessionId,
        _user: &UserId,
    ) -> Result<SessionPayload, ApiError> {
        let mut state = self.state()?;
        state.take_failure(ApiOperation::GetSession)?;
        state
            .sessions
            .get(session)
            .map(|stored| stored.payload.clone())
            .ok_or_else(|| not_found(session))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedPayload, ApiError> {
        self.state()?.take_failure(ApiOperation::Generate)?;

        let plan = generated_plan(request);
        let study_plan =
            serde_json::to_value(&plan).map_err(|e| ApiError::Unsuccessful(e.to_string()))?;
        let notes = format!("<h2>{}</h2><p>Key ideas to review.</p>", request.syllabus);
        let resources = "<ul><li>Official documentation</li></ul>".to_string();
        let session_id = self.seed_payload(
            &request.user_id,
            SessionPayload {
                study_plan: study_plan.clone(),
                notes: notes.clone(),
                resources: resources.clone(),
                syllabus: request.syllabus.clone(),
                difficulty: request.difficulty.as_str().to_string(),
                ..SessionPayload::default()
            },
        )?;
        if let Some(stored) = self.state()?.sessions.get_mut(&session_id) {
            stored.days = request.days.to_string();
        }

        tracing::debug!(session = %session_id, topics = plan.len(), "generated in-memory plan");
        Ok(GeneratedPayload {
            notes_file: Some(format!("notes/{session_id}.md")),
            session_id,
            study_plan,
            notes,
            resources,
            trace_summary: generated_trace(),
        })
    }

    async fn update_progress(
        &self,
        session: &SessionId,
        _user: &UserId,
        topic: &str,
        action: ProgressAction,
    ) -> Result<ProgressAck, ApiError> {
        let mut state = self.state()?;
        state
            .progress_calls
            .push((session.clone(), topic.to_string(), action));
        state.take_failure(ApiOperation::UpdateProgress)?;

        let now = state.clock.now();
        let stored = state
            .sessions
            .get_mut(session)
            .ok_or_else(|| not_found(session))?;
        // Only removals go through the backend's session update, which is
        // what stamps `last_updated`.
        match action {
            ProgressAction::Complete => stored
                .payload
                .progress
                .mark(topic, CompletionMarker::at(now)),
            ProgressAction::Uncomplete => {
                stored.payload.progress.unmark(topic);
                stored.last_updated = Some(iso_timestamp(now));
            }
        }

        let total = parse_stored_plan(&stored.payload.study_plan).len();
        let completed = stored.payload.progress.len();
        let verb = if action.marks_complete() {
            "complete"
        } else {
            "incomplete"
        };
        Ok(ProgressAck {
            message: Some(format!("Marked {topic} as {verb}")),
            stats: Some(ProgressSnapshot {
                completed_count: u32::try_from(completed).unwrap_or(u32::MAX),
                total_topics: u32::try_from(total).unwrap_or(u32::MAX),
                completion_percentage: completion_percentage(completed, total),
            }),
        })
    }
}
