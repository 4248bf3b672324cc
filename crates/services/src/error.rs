//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{IdError, SessionId};

/// Errors emitted by `StudyApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(String),
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("backend returned {status}: {message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("backend reported failure: {0}")]
    Unsuccessful(String),
    #[error("backend response is missing {0}")]
    Malformed(&'static str),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyServiceError {
    #[error("session {0} was not found")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while reading `ClientConfig` from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {raw:?}")]
    InvalidNumber { var: &'static str, raw: String },
    #[error("{var} must be a http(s) url, got {raw:?}")]
    InvalidUrl { var: &'static str, raw: String },
    #[error(transparent)]
    User(#[from] IdError),
}
