use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;

pub const UNTITLED_TOPIC: &str = "Untitled Topic";
pub const UNKNOWN_SLOT: &str = "N/A";

fn first_day() -> u32 {
    1
}

fn unknown_slot() -> String {
    UNKNOWN_SLOT.to_string()
}

fn untitled_topic() -> String {
    UNTITLED_TOPIC.to_string()
}

fn slot_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = lenient::text_or_empty(deserializer)?;
    Ok(if text.trim().is_empty() { unknown_slot() } else { text })
}

fn topic_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = lenient::text_or_empty(deserializer)?;
    Ok(if text.trim().is_empty() { untitled_topic() } else { text })
}

/// One scheduled study topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// 1-based day number.
    #[serde(default = "first_day", deserialize_with = "lenient::day_number")]
    pub day: u32,
    #[serde(default = "unknown_slot", deserialize_with = "slot_text")]
    pub time_slot: String,
    /// Progress-tracking key; unique within a session.
    #[serde(default = "untitled_topic", deserialize_with = "topic_text")]
    pub topic: String,
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_list", skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,
}

impl PlanEntry {
    #[must_use]
    pub fn new(day: u32, time_slot: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            day: day.max(1),
            time_slot: time_slot.into(),
            topic: topic.into(),
            description: None,
            activities: Vec::new(),
            expected_outcome: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = activities.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = Some(outcome.into());
        self
    }

    /// Rough duration label for the overview table.
    ///
    /// Slots are free text like `"9:00 AM - 11:00 AM"`; only ranges get a label.
    #[must_use]
    pub fn duration_label(&self) -> &'static str {
        if self.time_slot.contains(" - ") {
            "1-2 hrs"
        } else {
            UNKNOWN_SLOT
        }
    }
}

/// Ordered plan entries for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyPlan {
    entries: Vec<PlanEntry>,
}

impl StudyPlan {
    #[must_use]
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.topic.as_str())
    }

    /// Entries grouped by day, days ascending, plan order kept within a day.
    #[must_use]
    pub fn group_by_day(&self) -> BTreeMap<u32, Vec<&PlanEntry>> {
        let mut days: BTreeMap<u32, Vec<&PlanEntry>> = BTreeMap::new();
        for entry in &self.entries {
            days.entry(entry.day).or_default().push(entry);
        }
        days
    }

    /// Topic titles that occur more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_topics(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for topic in self.topics() {
            if !seen.insert(topic) && reported.insert(topic) {
                duplicates.push(topic);
            }
        }
        duplicates
    }

    /// Highest day number referenced by the plan.
    #[must_use]
    pub fn day_count(&self) -> u32 {
        self.entries.iter().map(|entry| entry.day).max().unwrap_or(0)
    }
}

impl From<Vec<PlanEntry>> for StudyPlan {
    fn from(entries: Vec<PlanEntry>) -> Self {
        Self::new(entries)
    }
}

/// Removes markdown code-fence markup around a generated JSON payload.
///
/// Text that does not start with a fence is only trimmed.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    trimmed
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parses a plan as the backend stores it.
///
/// Accepts an already structured value or a JSON-encoded string (optionally
/// fenced). A `{"plan": [...]}` wrapper is unwrapped and a lone object becomes
/// a one-entry plan. Malformed input yields an empty plan.
#[must_use]
pub fn parse_stored_plan(value: &Value) -> StudyPlan {
    match value {
        Value::Null => StudyPlan::default(),
        Value::String(text) => parse_plan_text(text),
        other => plan_from_structured(other.clone()),
    }
}

/// Parses a plan from raw generator text.
#[must_use]
pub fn parse_plan_text(text: &str) -> StudyPlan {
    let clean = strip_code_fences(text);
    match serde_json::from_str::<Value>(&clean) {
        Ok(value) => plan_from_structured(value),
        Err(err) => {
            tracing::warn!(error = %err, "stored plan is not valid JSON");
            StudyPlan::default()
        }
    }
}

fn plan_from_structured(value: Value) -> StudyPlan {
    let value = match value {
        Value::Object(mut map) if map.contains_key("plan") => {
            map.remove("plan").unwrap_or(Value::Null)
        }
        other => other,
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Null => return StudyPlan::default(),
        single => vec![single],
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<PlanEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                tracing::warn!(error = %err, "stored plan has a malformed entry");
                return StudyPlan::default();
            }
        }
    }
    StudyPlan::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grouping_keeps_plan_order_within_day() {
        let plan = StudyPlan::new(vec![
            PlanEntry::new(1, "9-10", "Intro"),
            PlanEntry::new(2, "9-10", "Graphs"),
            PlanEntry::new(1, "11-12", "Sets"),
        ]);
        let groups = plan.group_by_day();
        let days: Vec<u32> = groups.keys().copied().collect();
        assert_eq!(days, vec![1, 2]);
        let day_one: Vec<&str> = groups[&1].iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(day_one, vec!["Intro", "Sets"]);
        assert_eq!(groups[&2][0].topic, "Graphs");
    }

    #[test]
    fn groups_sort_numerically_not_lexically() {
        let plan = StudyPlan::new(vec![
            PlanEntry::new(10, "a", "Late"),
            PlanEntry::new(2, "a", "Early"),
        ]);
        let days: Vec<u32> = plan.group_by_day().keys().copied().collect();
        assert_eq!(days, vec![2, 10]);
    }

    #[test]
    fn structured_object_becomes_single_entry() {
        let plan = parse_stored_plan(&json!({"day": 1, "time_slot": "9-10", "topic": "Intro"}));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].topic, "Intro");
    }

    #[test]
    fn structured_array_is_used_as_is() {
        let plan = parse_stored_plan(&json!([
            {"day": 1, "time_slot": "9-10", "topic": "A"},
            {"day": 2, "time_slot": "9-10", "topic": "B"}
        ]));
        assert_eq!(plan.topics().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn fenced_string_is_unwrapped_before_decoding() {
        let raw = "```json\n[{\"day\": 1, \"time_slot\": \"9-10\", \"topic\": \"Intro\"}]\n```";
        let plan = parse_stored_plan(&Value::String(raw.to_string()));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].time_slot, "9-10");
    }

    #[test]
    fn plan_wrapper_object_is_unwrapped() {
        let raw = r#"{"plan": [{"day": "3", "topic": "Trees"}]}"#;
        let plan = parse_plan_text(raw);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].day, 3);
        assert_eq!(plan.entries()[0].time_slot, UNKNOWN_SLOT);
    }

    #[test]
    fn malformed_string_yields_empty_plan() {
        assert!(parse_stored_plan(&json!("```json\n[{not json")).is_empty());
        assert!(parse_stored_plan(&json!("plain words")).is_empty());
        assert!(parse_stored_plan(&Value::Null).is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let plan = parse_stored_plan(&json!([{"description": "", "activities": ["read", null]}]));
        let entry = &plan.entries()[0];
        assert_eq!(entry.day, 1);
        assert_eq!(entry.topic, UNTITLED_TOPIC);
        assert_eq!(entry.description, None);
        assert_eq!(entry.activities, vec!["read".to_string()]);
    }

    #[test]
    fn duplicate_topics_are_reported_once() {
        let plan = StudyPlan::new(vec![
            PlanEntry::new(1, "a", "X"),
            PlanEntry::new(1, "b", "X"),
            PlanEntry::new(2, "a", "X"),
            PlanEntry::new(2, "b", "Y"),
        ]);
        assert_eq!(plan.duplicate_topics(), vec!["X"]);
        assert_eq!(plan.day_count(), 2);
    }

    #[test]
    fn duration_label_requires_range() {
        assert_eq!(PlanEntry::new(1, "9:00 AM - 11:00 AM", "t").duration_label(), "1-2 hrs");
        assert_eq!(PlanEntry::new(1, "Morning", "t").duration_label(), "N/A");
    }
}
