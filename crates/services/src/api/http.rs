use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use study_core::model::{
    GenerateRequest, ProgressAction, SessionId, SessionListItem, UserId,
};

use super::StudyApi;
use super::wire::{
    Envelope, ErrorBody, GenerateResponse, GeneratedPayload, ListSessionsResponse, ProgressAck,
    ProgressBody, ProgressResponse, SessionPayload, SessionResponse,
};
use crate::config::ClientConfig;
use crate::error::ApiError;

/// `StudyApi` over the backend's JSON HTTP interface.
#[derive(Clone, Debug)]
pub struct HttpStudyApi {
    client: Client,
    base_url: Url,
}

impl HttpStudyApi {
    /// # Errors
    ///
    /// Returns `ApiError` when the base url cannot carry path segments or the
    /// HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Decodes a JSON body, turning non-2xx statuses into `ApiError`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty());
    match message {
        Some(message) => Err(ApiError::Server { status, message }),
        None => Err(ApiError::HttpStatus(status)),
    }
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn list_sessions(&self, user: &UserId) -> Result<Vec<SessionListItem>, ApiError> {
        let url = self.endpoint(&["sessions", "list", user.as_str()])?;
        tracing::debug!(%url, "listing sessions");
        let body: ListSessionsResponse = read_json(self.client.get(url).send().await?).await?;
        body.ensure_success()?;
        Ok(body.sessions)
    }

    async fn get_session(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<SessionPayload, ApiError> {
        let mut url = self.endpoint(&["session", session.as_str()])?;
        url.query_pairs_mut().append_pair("user_id", user.as_str());
        tracing::debug!(%url, "fetching session");
        let body: SessionResponse = read_json(self.client.get(url).send().await?).await?;
        body.ensure_success()?;
        body.session.ok_or(ApiError::Malformed("session"))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedPayload, ApiError> {
        let url = self.endpoint(&["generate"])?;
        tracing::debug!(%url, user = %request.user_id, days = request.days, "generating plan");
        let body: GenerateResponse =
            read_json(self.client.post(url).json(request).send().await?).await?;
        body.into_payload()
    }

    async fn update_progress(
        &self,
        session: &SessionId,
        user: &UserId,
        topic: &str,
        action: ProgressAction,
    ) -> Result<ProgressAck, ApiError> {
        let url = self.endpoint(&["progress", session.as_str()])?;
        let payload = ProgressBody {
            user_id: user,
            topic,
            action,
        };
        tracing::debug!(%url, topic, action = action.as_str(), "updating progress");
        let body: ProgressResponse =
            read_json(self.client.post(url).json(&payload).send().await?).await?;
        body.ensure_success()?;
        Ok(ProgressAck {
            message: body.message,
            stats: body.stats,
        })
    }
}
