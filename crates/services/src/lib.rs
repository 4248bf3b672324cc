#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod study_service;

pub use study_core::Clock;

pub use api::{
    ApiOperation, GeneratedPayload, HttpStudyApi, InMemoryStudyApi, ProgressAck, SessionPayload,
    StudyApi,
};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ApiError, ConfigError, StudyServiceError};
pub use study_service::{StudyService, session_from_stored};
