use study_core::model::{PlanEntry, StudyPlan};

pub const NO_PLAN_DATA: &str = "No plan data available";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanRowVm {
    pub day: u32,
    pub time_slot: String,
    pub topic: String,
    pub duration: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanCardVm {
    pub time_slot: String,
    pub topic: String,
    pub description: Option<String>,
    pub activities: Vec<String>,
    pub expected_outcome: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayScheduleVm {
    pub day: u32,
    pub heading: String,
    pub cards: Vec<PlanCardVm>,
}

/// Overview table plus the detailed schedule grouped by day.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanVm {
    pub rows: Vec<PlanRowVm>,
    pub days: Vec<DayScheduleVm>,
}

impl PlanVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

impl From<&PlanEntry> for PlanCardVm {
    fn from(entry: &PlanEntry) -> Self {
        Self {
            time_slot: entry.time_slot.clone(),
            topic: entry.topic.clone(),
            description: non_blank(entry.description.as_ref()),
            activities: entry
                .activities
                .iter()
                .map(|activity| activity.trim())
                .filter(|activity| !activity.is_empty())
                .map(str::to_owned)
                .collect(),
            expected_outcome: non_blank(entry.expected_outcome.as_ref()),
        }
    }
}

#[must_use]
pub fn map_plan(plan: &StudyPlan) -> PlanVm {
    let rows = plan
        .entries()
        .iter()
        .map(|entry| PlanRowVm {
            day: entry.day,
            time_slot: entry.time_slot.clone(),
            topic: entry.topic.clone(),
            duration: entry.duration_label(),
        })
        .collect();
    let days = plan
        .group_by_day()
        .into_iter()
        .map(|(day, entries)| DayScheduleVm {
            day,
            heading: format!("Day {day} Schedule"),
            cards: entries.into_iter().map(PlanCardVm::from).collect(),
        })
        .collect();
    PlanVm { rows, days }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_cards_by_day_in_order() {
        let plan = StudyPlan::new(vec![
            PlanEntry::new(2, "09:00 - 10:00", "Traits"),
            PlanEntry::new(1, "09:00", "Syntax").with_description("  "),
            PlanEntry::new(2, "13:00", "Generics").with_activities(["Read", " "]),
        ]);
        let vm = map_plan(&plan);

        assert_eq!(vm.rows.len(), 3);
        assert_eq!(vm.rows[0].duration, "1-2 hrs");
        assert_eq!(vm.rows[1].duration, "N/A");

        let headings: Vec<&str> = vm.days.iter().map(|day| day.heading.as_str()).collect();
        assert_eq!(headings, ["Day 1 Schedule", "Day 2 Schedule"]);
        assert_eq!(vm.days[1].cards[0].topic, "Traits");
        assert_eq!(vm.days[1].cards[1].activities, ["Read"]);
        assert_eq!(vm.days[0].cards[0].description, None);
    }

    #[test]
    fn empty_plan_maps_to_empty_vm() {
        assert!(map_plan(&StudyPlan::default()).is_empty());
    }
}
