//! JSON shapes exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use study_core::lenient;
use study_core::model::{
    ProgressAction, ProgressMap, ProgressSnapshot, SessionId, SessionListItem, TraceSummary,
    UserId,
};

use crate::error::ApiError;

/// Fields every response may carry.
pub(crate) trait Envelope {
    fn success(&self) -> bool;
    fn error(&self) -> Option<&str>;

    fn ensure_success(&self) -> Result<(), ApiError> {
        if self.success() {
            return Ok(());
        }
        Err(ApiError::Unsuccessful(
            self.error().unwrap_or("no error message").to_string(),
        ))
    }
}

macro_rules! envelope {
    ($ty:ty) => {
        impl Envelope for $ty {
            fn success(&self) -> bool {
                self.success
            }

            fn error(&self) -> Option<&str> {
                self.error.as_deref()
            }
        }
    };
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListSessionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sessions: Vec<SessionListItem>,
    #[serde(default)]
    pub error: Option<String>,
}
envelope!(ListSessionsResponse);

#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session: Option<SessionPayload>,
    #[serde(default)]
    pub error: Option<String>,
}
envelope!(SessionResponse);

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub study_plan: Value,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub resources: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub notes_file: Option<String>,
    #[serde(default)]
    pub trace_summary: Option<TraceSummary>,
    #[serde(default)]
    pub error: Option<String>,
}
envelope!(GenerateResponse);

impl GenerateResponse {
    pub(crate) fn into_payload(self) -> Result<GeneratedPayload, ApiError> {
        self.ensure_success()?;
        let session_id = self.session_id.ok_or(ApiError::Malformed("session_id"))?;
        Ok(GeneratedPayload {
            session_id,
            study_plan: self.study_plan,
            notes: self.notes,
            resources: self.resources,
            notes_file: self.notes_file,
            trace_summary: self.trace_summary.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stats: Option<ProgressSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}
envelope!(ProgressResponse);

#[derive(Debug, Serialize)]
pub(crate) struct ProgressBody<'a> {
    pub user_id: &'a UserId,
    pub topic: &'a str,
    pub action: ProgressAction,
}

/// A stored session as returned by `GET /session/{id}`.
///
/// `study_plan` is kept raw: older sessions hold generator text, newer ones
/// structured JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub study_plan: Value,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub resources: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub notes_file: Option<String>,
    #[serde(default)]
    pub progress: ProgressMap,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub syllabus: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub user_id: Option<String>,
}

/// Result of `POST /generate`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPayload {
    pub session_id: SessionId,
    pub study_plan: Value,
    pub notes: String,
    pub resources: String,
    pub notes_file: Option<String>,
    pub trace_summary: TraceSummary,
}

/// Result of `POST /progress/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressAck {
    pub message: Option<String>,
    pub stats: Option<ProgressSnapshot>,
}
