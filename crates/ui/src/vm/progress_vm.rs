use study_core::{ProgressStats, ProgressTracker};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistItemVm {
    pub topic: String,
    pub time_slot: String,
    pub day_badge: String,
    pub completed: bool,
    /// A request for this topic has not been acknowledged yet.
    pub syncing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressStatsVm {
    pub completed: usize,
    pub remaining: usize,
    pub percentage_label: String,
    pub bar_width: u32,
    /// Hidden on narrow bars.
    pub bar_label: Option<String>,
}

impl From<ProgressStats> for ProgressStatsVm {
    fn from(stats: ProgressStats) -> Self {
        let label = format!("{}%", stats.percentage);
        Self {
            completed: stats.completed,
            remaining: stats.remaining,
            bar_width: stats.percentage.min(100),
            bar_label: (stats.percentage > 10).then(|| label.clone()),
            percentage_label: label,
        }
    }
}

#[must_use]
pub fn map_checklist(tracker: &ProgressTracker) -> Vec<ChecklistItemVm> {
    tracker
        .items()
        .iter()
        .map(|item| ChecklistItemVm {
            topic: item.topic.clone(),
            time_slot: item.time_slot.clone(),
            day_badge: format!("Day {}", item.day),
            completed: tracker.is_complete(&item.topic),
            syncing: tracker.is_syncing(&item.topic),
        })
        .collect()
}
