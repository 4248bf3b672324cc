use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::model::{ProgressMap, SessionId, StudyPlan, TraceSummary, UserId};

/// A user's study plan instance with its notes, resources and progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub syllabus: String,
    pub difficulty: String,
    pub plan: StudyPlan,
    /// Rendered HTML from the backend.
    pub notes: String,
    /// Rendered HTML from the backend.
    pub resources: String,
    pub notes_file: String,
    pub progress: ProgressMap,
    /// Only present right after generation.
    pub trace_summary: TraceSummary,
}

impl Session {
    /// Placeholder shown when the backend did not write a notes file.
    pub const NO_NOTES_FILE: &'static str = "N/A";

    #[must_use]
    pub fn total_topics(&self) -> usize {
        self.plan.len()
    }

    /// Completed topics that still exist in the plan.
    #[must_use]
    pub fn completed_topics(&self) -> usize {
        self.plan
            .topics()
            .filter(|topic| self.progress.is_complete(topic))
            .count()
    }
}

/// One row of a user's session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListItem {
    pub session_id: SessionId,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub syllabus: String,
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub total_topics: u32,
    /// Requested plan length; free text on older sessions.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub days: String,
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub completion_percentage: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub completed_count: u32,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl SessionListItem {
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Last activity, falling back to creation time.
    #[must_use]
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_updated
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_at())
    }
}

/// Orders history rows most recently active first; rows without timestamps go last.
pub fn sort_most_recent_first(items: &mut [SessionListItem]) {
    items.sort_by(|left, right| right.last_activity().cmp(&left.last_activity()));
}

/// Parses RFC 3339 or the backend's naive ISO timestamps (treated as UTC).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
