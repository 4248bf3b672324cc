use std::env;
use std::path::PathBuf;
use std::time::Duration;

use study_core::model::UserId;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Client-side settings, read from `STUDY_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// User assumed when the plan form leaves the name blank.
    pub default_user: UserId,
    /// Plan generation runs several model calls, so this is generous.
    pub timeout: Duration,
    /// How long the empty-history message stays up before the form opens.
    pub empty_history_delay: Duration,
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            default_user: UserId::fallback(),
            timeout: Duration::from_secs(120),
            empty_history_delay: Duration::from_millis(2000),
            export_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`; unset or blank keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("STUDY_API_URL") {
            config = config.with_base_url(raw)?;
        }
        if let Some(raw) = get("STUDY_USER_ID") {
            config.default_user = UserId::new(raw)?;
        }
        if let Some(raw) = get("STUDY_HTTP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("STUDY_HTTP_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = get("STUDY_EMPTY_HISTORY_DELAY_MS") {
            config.empty_history_delay =
                Duration::from_millis(parse_number("STUDY_EMPTY_HISTORY_DELAY_MS", &raw)?);
        }
        if let Some(raw) = get("STUDY_EXPORT_DIR") {
            config.export_dir = PathBuf::from(raw);
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` unless `raw` is an absolute http(s) url.
    pub fn with_base_url(mut self, raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        let valid = Url::parse(raw.trim())
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        if !valid {
            return Err(ConfigError::InvalidUrl {
                var: "STUDY_API_URL",
                raw,
            });
        }
        self.base_url = raw.trim().to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_default_user(mut self, user: UserId) -> Self {
        self.default_user = user;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_empty_history_delay(mut self, delay: Duration) -> Self {
        self.empty_history_delay = delay;
        self
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        raw: raw.to_string(),
    })
}
