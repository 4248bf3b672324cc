use study_core::model::{SessionId, SessionListItem};

use crate::vm::time_fmt::format_session_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCardVm {
    pub session_id: SessionId,
    pub title: String,
    pub date: String,
    pub difficulty: String,
    pub topics_label: String,
    pub days_label: String,
    /// Progress bar width in percent.
    pub progress_width: u32,
    pub progress_label: String,
}

impl From<&SessionListItem> for SessionCardVm {
    fn from(item: &SessionListItem) -> Self {
        let title = if item.syllabus.trim().is_empty() {
            "Untitled syllabus".to_string()
        } else {
            item.syllabus.trim().to_string()
        };
        let days = if item.days.trim().is_empty() {
            "N/A"
        } else {
            item.days.trim()
        };
        Self {
            session_id: item.session_id.clone(),
            title,
            date: format_session_date(item.created_at.as_deref()),
            difficulty: item.difficulty.clone(),
            topics_label: format!("{} topics", item.total_topics),
            days_label: format!("{days} days"),
            progress_width: item.completion_percentage.min(100),
            progress_label: format!(
                "{}/{} completed ({}%)",
                item.completed_count, item.total_topics, item.completion_percentage
            ),
        }
    }
}

#[must_use]
pub fn map_session_cards(items: &[SessionListItem]) -> Vec<SessionCardVm> {
    items.iter().map(SessionCardVm::from).collect()
}
