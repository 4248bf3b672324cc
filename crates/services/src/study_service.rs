use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;

use study_core::SyncRequest;
use study_core::model::{
    GenerateRequest, ProgressMap, ProgressSnapshot, Session, SessionId, SessionListItem, UserId,
    parse_stored_plan, sort_most_recent_first,
};

use crate::api::{GeneratedPayload, SessionPayload, StudyApi};
use crate::error::{ApiError, StudyServiceError};

/// Facade the UI talks to; turns backend payloads into domain sessions.
#[derive(Clone)]
pub struct StudyService {
    api: Arc<dyn StudyApi>,
}

impl fmt::Debug for StudyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyService").finish_non_exhaustive()
    }
}

impl StudyService {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self { api }
    }

    /// History rows for `user`, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Api` when the backend call fails.
    pub async fn list_sessions(
        &self,
        user: &UserId,
    ) -> Result<Vec<SessionListItem>, StudyServiceError> {
        let mut sessions = self.api.list_sessions(user).await?;
        sort_most_recent_first(&mut sessions);
        tracing::info!(user = %user, count = sessions.len(), "loaded session history");
        Ok(sessions)
    }

    /// Loads a stored session and parses its plan.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::UnknownSession` on a 404 and
    /// `StudyServiceError::Api` for other failures.
    pub async fn resume(
        &self,
        id: &SessionId,
        user: &UserId,
    ) -> Result<Session, StudyServiceError> {
        let payload = self
            .api
            .get_session(id, user)
            .await
            .map_err(|err| match err {
                ApiError::Server { status, .. } | ApiError::HttpStatus(status)
                    if status == StatusCode::NOT_FOUND =>
                {
                    StudyServiceError::UnknownSession(id.clone())
                }
                other => StudyServiceError::Api(other),
            })?;
        let session = session_from_stored(id.clone(), user.clone(), payload);
        tracing::info!(
            session = %id,
            topics = session.total_topics(),
            completed = session.completed_topics(),
            last_completed = ?session.progress.last_completed_at(),
            "resumed session"
        );
        Ok(session)
    }

    /// Generates a new plan; the returned session starts with no progress.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Api` when generation fails.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<Session, StudyServiceError> {
        tracing::info!(
            user = %request.user_id,
            days = request.days,
            difficulty = request.difficulty.as_str(),
            "requesting plan generation"
        );
        let payload = self.api.generate(request).await?;
        let session = session_from_generated(request, payload);
        tracing::info!(session = %session.id, topics = session.total_topics(), "plan generated");
        Ok(session)
    }

    /// Persists one toggle. Returns the backend's stats when it sent any.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Api` when the update is rejected.
    pub async fn record_progress(
        &self,
        session: &SessionId,
        user: &UserId,
        request: &SyncRequest,
    ) -> Result<Option<ProgressSnapshot>, StudyServiceError> {
        let ack = self
            .api
            .update_progress(session, user, &request.topic, request.action)
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    session = %session,
                    topic = %request.topic,
                    action = request.action.as_str(),
                    error = %err,
                    "progress update failed"
                );
            })?;
        tracing::debug!(
            session = %session,
            topic = %request.topic,
            message = ack.message.as_deref().unwrap_or_default(),
            "progress recorded"
        );
        Ok(ack.stats)
    }
}

fn notes_file_or_placeholder(notes_file: Option<String>) -> String {
    notes_file.unwrap_or_else(|| Session::NO_NOTES_FILE.to_string())
}

/// Builds a `Session` from a stored payload.
#[must_use]
pub fn session_from_stored(id: SessionId, user: UserId, payload: SessionPayload) -> Session {
    Session {
        id,
        user_id: user,
        syllabus: payload.syllabus,
        difficulty: payload.difficulty,
        plan: parse_stored_plan(&payload.study_plan),
        notes: payload.notes,
        resources: payload.resources,
        notes_file: notes_file_or_placeholder(payload.notes_file),
        progress: payload.progress,
        trace_summary: Default::default(),
    }
}

fn session_from_generated(request: &GenerateRequest, payload: GeneratedPayload) -> Session {
    Session {
        id: payload.session_id,
        user_id: request.user_id.clone(),
        syllabus: request.syllabus.clone(),
        difficulty: request.difficulty.as_str().to_string(),
        plan: parse_stored_plan(&payload.study_plan),
        notes: payload.notes,
        resources: payload.resources,
        notes_file: notes_file_or_placeholder(payload.notes_file),
        progress: ProgressMap::new(),
        trace_summary: payload.trace_summary,
    }
}
