use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::model::parse_timestamp;
use crate::time::iso_timestamp;

/// Server-side marker stored per completed topic.
///
/// Presence of the key is what counts; the marker contents are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMarker {
    #[serde(default = "completed_true")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub completed_at: Option<String>,
}

fn completed_true() -> bool {
    true
}

impl CompletionMarker {
    #[must_use]
    pub fn at(completed_at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(iso_timestamp(completed_at)),
        }
    }

    /// Completion time, accepting both offset and naive ISO timestamps.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at.as_deref().and_then(parse_timestamp)
    }
}

/// Mapping from topic title to completion marker, as persisted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<String, CompletionMarker>);

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_complete(&self, topic: &str) -> bool {
        self.0.contains_key(topic)
    }

    pub fn mark(&mut self, topic: impl Into<String>, marker: CompletionMarker) {
        self.0.insert(topic.into(), marker);
    }

    /// Returns true when the topic was present.
    pub fn unmark(&mut self, topic: &str) -> bool {
        self.0.remove(topic).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn marker(&self, topic: &str) -> Option<&CompletionMarker> {
        self.0.get(topic)
    }

    /// Most recent completion time among markers that carry one.
    #[must_use]
    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.0.values().filter_map(CompletionMarker::completed_at).max()
    }
}

impl<S: Into<String>> FromIterator<S> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|topic| (topic.into(), CompletionMarker { completed: true, completed_at: None }))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for ProgressMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Older sessions store `true` or a bare timestamp instead of a marker object.
        let value = Value::deserialize(deserializer)?;
        let Value::Object(entries) = value else {
            return Ok(Self::default());
        };
        let map = entries
            .into_iter()
            .map(|(topic, raw)| {
                let marker = match raw {
                    Value::Object(_) => serde_json::from_value(raw).unwrap_or_default(),
                    other => CompletionMarker {
                        completed: true,
                        completed_at: other.as_str().map(str::to_owned),
                    },
                };
                (topic, marker)
            })
            .collect();
        Ok(Self(map))
    }
}

/// Whether a progress update marks a topic done or not done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressAction {
    Complete,
    Uncomplete,
}

impl ProgressAction {
    #[must_use]
    pub fn for_state(completed: bool) -> Self {
        if completed { Self::Complete } else { Self::Uncomplete }
    }

    #[must_use]
    pub fn marks_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Uncomplete => "uncomplete",
        }
    }
}

/// Completion statistics as reported by the backend after a progress update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub completed_count: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub total_topics: u32,
    #[serde(default, deserialize_with = "lenient::u32_or_default")]
    pub completion_percentage: u32,
}

/// `round(100 * completed / total)`, or 0 for an empty plan. Halves round up.
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    u32::try_from((200 * completed + total) / (2 * total)).unwrap_or(100)
}
