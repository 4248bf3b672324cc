mod http;
mod memory;
pub mod wire;

use async_trait::async_trait;

use study_core::model::{
    GenerateRequest, ProgressAction, SessionId, SessionListItem, UserId,
};

use crate::error::ApiError;

pub use http::HttpStudyApi;
pub use memory::{ApiOperation, InMemoryStudyApi};
pub use wire::{GeneratedPayload, ProgressAck, SessionPayload};

/// Contract for the study-plan backend.
///
/// Implementations translate `success: false` envelopes and non-2xx statuses
/// into `ApiError`, so callers only see successful payloads.
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// List a user's sessions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the backend rejects it.
    async fn list_sessions(&self, user: &UserId) -> Result<Vec<SessionListItem>, ApiError>;

    /// Fetch one stored session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the session is unknown.
    async fn get_session(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<SessionPayload, ApiError>;

    /// Generate and store a new plan.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or generation fails server-side.
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedPayload, ApiError>;

    /// Persist completion of one topic.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the backend rejects it.
    async fn update_progress(
        &self,
        session: &SessionId,
        user: &UserId,
        topic: &str,
        action: ProgressAction,
    ) -> Result<ProgressAck, ApiError>;
}
