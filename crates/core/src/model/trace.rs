use serde::{Deserialize, Serialize};

use crate::lenient;

/// Outcome of one backend agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Success,
    Failed,
    Running,
    #[serde(other)]
    Unknown,
}

impl TraceStatus {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub agent: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub function: String,
    #[serde(default = "unknown_status")]
    pub status: TraceStatus,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn unknown_status() -> TraceStatus {
    TraceStatus::Unknown
}

/// Timing of the backend's generation pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    #[serde(default)]
    pub total_traces: usize,
    /// Seconds.
    #[serde(default)]
    pub total_duration: f64,
    #[serde(default)]
    pub traces: Vec<TraceEntry>,
}

impl TraceSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}
