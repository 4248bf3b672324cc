//! Topic-completion checklist with optimistic updates.
//!
//! The tracker owns the visible completion marks for one session and keeps
//! them reconciled with what the backend acknowledged. It never performs I/O:
//! `toggle` hands back the request to send and `settle` consumes its outcome.
//!
//! Requests are serialized per topic. While one is in flight, further toggles
//! of the same topic only move the visible mark; once the in-flight request
//! settles, a single follow-up carries the latest mark if it still differs
//! from the acknowledged one.

use std::collections::HashMap;

use crate::model::{ProgressAction, ProgressMap, StudyPlan, completion_percentage};

/// One row of the checklist, in plan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub index: usize,
    pub day: u32,
    pub time_slot: String,
    pub topic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percentage: u32,
}

impl ProgressStats {
    #[must_use]
    pub fn from_counts(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        Self {
            total,
            completed,
            remaining: total - completed,
            percentage: completion_percentage(completed, total),
        }
    }

    #[must_use]
    pub fn is_fully_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Identifies one progress request.
///
/// `generation` tells trackers for the same session apart, so an answer sent
/// to an earlier view of the session never settles a later request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyncTicket {
    pub generation: u64,
    pub sequence: u64,
}

/// A progress update that must be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncRequest {
    pub topic: String,
    pub action: ProgressAction,
    pub ticket: SyncTicket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Visible mark after the toggle.
    pub completed: bool,
    /// `None` when a request for this topic is already in flight.
    pub request: Option<SyncRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleOutcome {
    /// The visible mark was reverted to the acknowledged value.
    pub rolled_back: bool,
    pub follow_up: Option<SyncRequest>,
    /// The settlement did not match the in-flight request and was ignored.
    pub stale: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recompute {
    pub stats: ProgressStats,
    /// True only on the transition into the fully complete state.
    pub all_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    ticket: SyncTicket,
    complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TopicSync {
    acknowledged: bool,
    visible: bool,
    in_flight: Option<InFlight>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    items: Vec<ChecklistItem>,
    topics: HashMap<String, TopicSync>,
    was_complete: bool,
    generation: u64,
    last_sequence: u64,
}

impl ProgressTracker {
    /// Seeds the checklist: an entry is complete iff its topic is a key of `progress`.
    ///
    /// The seeded state is the celebration baseline, so a session that loads
    /// already complete does not celebrate.
    #[must_use]
    pub fn new(plan: &StudyPlan, progress: &ProgressMap) -> Self {
        let duplicates = plan.duplicate_topics();
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "plan repeats topic titles; repeats share completion");
        }

        let items: Vec<ChecklistItem> = plan
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| ChecklistItem {
                index,
                day: entry.day,
                time_slot: entry.time_slot.clone(),
                topic: entry.topic.clone(),
            })
            .collect();

        let topics = items
            .iter()
            .map(|item| {
                let done = progress.is_complete(&item.topic);
                (
                    item.topic.clone(),
                    TopicSync {
                        acknowledged: done,
                        visible: done,
                        in_flight: None,
                    },
                )
            })
            .collect();

        let mut tracker = Self {
            items,
            topics,
            was_complete: false,
            generation: 0,
            last_sequence: 0,
        };
        tracker.was_complete = tracker.stats().is_fully_complete();
        tracker
    }

    /// Stamps every request issued by this tracker with `generation`.
    #[must_use]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible mark for a topic; unknown topics are incomplete.
    #[must_use]
    pub fn is_complete(&self, topic: &str) -> bool {
        self.topics.get(topic).is_some_and(|sync| sync.visible)
    }

    /// Whether the backend has acknowledged the topic as complete.
    #[must_use]
    pub fn is_acknowledged(&self, topic: &str) -> bool {
        self.topics.get(topic).is_some_and(|sync| sync.acknowledged)
    }

    #[must_use]
    pub fn is_syncing(&self, topic: &str) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|sync| sync.in_flight.is_some())
    }

    /// Flips the visible mark. Returns `None` for topics not in the plan.
    pub fn toggle(&mut self, topic: &str) -> Option<ToggleOutcome> {
        let sync = self.topics.get_mut(topic)?;
        sync.visible = !sync.visible;
        let completed = sync.visible;
        let needs_request = sync.in_flight.is_none() && sync.visible != sync.acknowledged;

        let request = needs_request.then(|| self.send(topic, completed));
        Some(ToggleOutcome { completed, request })
    }

    /// Applies the backend's answer to an in-flight request.
    ///
    /// Answers whose ticket does not match the topic's in-flight request are
    /// reported as stale and change nothing.
    pub fn settle(&mut self, request: &SyncRequest, succeeded: bool) -> SettleOutcome {
        let stale = SettleOutcome {
            stale: true,
            ..SettleOutcome::default()
        };
        let Some(sync) = self.topics.get_mut(&request.topic) else {
            return stale;
        };
        let Some(sent) = sync.in_flight.filter(|f| f.ticket == request.ticket) else {
            return stale;
        };
        sync.in_flight = None;

        if !succeeded {
            let rolled_back = sync.visible != sync.acknowledged;
            sync.visible = sync.acknowledged;
            return SettleOutcome {
                rolled_back,
                ..SettleOutcome::default()
            };
        }

        sync.acknowledged = sent.complete;
        let pending = (sync.visible != sync.acknowledged).then_some(sync.visible);
        SettleOutcome {
            follow_up: pending.map(|complete| self.send(&request.topic, complete)),
            ..SettleOutcome::default()
        }
    }

    /// Issues a request for `topic` and records it as in flight.
    fn send(&mut self, topic: &str, complete: bool) -> SyncRequest {
        self.last_sequence += 1;
        let ticket = SyncTicket {
            generation: self.generation,
            sequence: self.last_sequence,
        };
        if let Some(sync) = self.topics.get_mut(topic) {
            sync.in_flight = Some(InFlight { ticket, complete });
        }
        SyncRequest {
            topic: topic.to_string(),
            action: ProgressAction::for_state(complete),
            ticket,
        }
    }

    /// Statistics over checklist rows, without touching the celebration edge.
    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        let completed = self
            .items
            .iter()
            .filter(|item| self.is_complete(&item.topic))
            .count();
        ProgressStats::from_counts(completed, self.items.len())
    }

    /// Recomputes statistics and reports the rising edge into "all complete".
    pub fn recompute(&mut self) -> Recompute {
        let stats = self.stats();
        let complete = stats.is_fully_complete();
        let all_complete = complete && !self.was_complete;
        self.was_complete = complete;
        Recompute {
            stats,
            all_complete,
        }
    }

    /// Topics currently shown as complete, in plan order without repeats.
    #[must_use]
    pub fn completed_topics(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.items
            .iter()
            .map(|item| item.topic.as_str())
            .filter(|topic| self.is_complete(topic) && seen.insert(*topic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlanEntry;

    fn plan(topics: &[&str]) -> StudyPlan {
        StudyPlan::new(
            topics
                .iter()
                .enumerate()
                .map(|(i, topic)| PlanEntry::new(u32::try_from(i).unwrap() + 1, "9-10", *topic))
                .collect(),
        )
    }

    #[test]
    fn seeds_marks_from_progress_keys() {
        let progress: ProgressMap = ["B"].into_iter().collect();
        let tracker = ProgressTracker::new(&plan(&["A", "B", "C"]), &progress);
        let marks: Vec<bool> = tracker
            .items()
            .iter()
            .map(|item| tracker.is_complete(&item.topic))
            .collect();
        assert_eq!(marks, vec![false, true, false]);
        assert_eq!(
            tracker.stats(),
            ProgressStats {
                total: 3,
                completed: 1,
                remaining: 2,
                percentage: 33
            }
        );
    }

    #[test]
    fn empty_plan_has_zero_percentage_and_never_celebrates() {
        let mut tracker = ProgressTracker::new(&StudyPlan::default(), &ProgressMap::new());
        let result = tracker.recompute();
        assert_eq!(result.stats.percentage, 0);
        assert!(!result.all_complete);
    }

    #[test]
    fn toggle_is_optimistic_and_requests_persistence() {
        let mut tracker = ProgressTracker::new(&plan(&["A"]), &ProgressMap::new());
        let outcome = tracker.toggle("A").unwrap();
        assert!(outcome.completed);
        assert!(tracker.is_complete("A"));
        assert!(!tracker.is_acknowledged("A"));
        assert_eq!(
            outcome.request,
            Some(SyncRequest {
                topic: "A".into(),
                action: ProgressAction::Complete,
                ticket: SyncTicket {
                    generation: 0,
                    sequence: 1
                },
            })
        );
    }

    #[test]
    fn failed_request_rolls_back_visible_mark() {
        let mut tracker = ProgressTracker::new(&plan(&["A"]), &ProgressMap::new());
        let request = tracker.toggle("A").unwrap().request.unwrap();
        let settled = tracker.settle(&request, false);
        assert!(settled.rolled_back);
        assert!(!tracker.is_complete("A"));
        assert!(!tracker.is_syncing("A"));
    }

    #[test]
    fn toggling_twice_restores_visual_and_persisted_state() {
        let progress: ProgressMap = ["A"].into_iter().collect();
        let mut tracker = ProgressTracker::new(&plan(&["A", "B"]), &progress);
        let before = tracker.clone();

        let first = tracker.toggle("A").unwrap().request.unwrap();
        assert_eq!(tracker.settle(&first, true), SettleOutcome::default());
        let second = tracker.toggle("A").unwrap().request.unwrap();
        assert_eq!(second.action, ProgressAction::Complete);
        assert_eq!(tracker.settle(&second, true), SettleOutcome::default());

        assert_eq!(tracker.is_complete("A"), before.is_complete("A"));
        assert_eq!(tracker.is_acknowledged("A"), before.is_acknowledged("A"));
        assert_eq!(tracker.stats(), before.stats());
    }

    #[test]
    fn rapid_toggles_are_serialized_per_topic() {
        let mut tracker = ProgressTracker::new(&plan(&["A"]), &ProgressMap::new());
        let first = tracker.toggle("A").unwrap().request.unwrap();
        let queued = tracker.toggle("A").unwrap();
        assert!(!queued.completed);
        assert_eq!(queued.request, None);

        let settled = tracker.settle(&first, true);
        let follow_up = settled.follow_up.unwrap();
        assert_eq!(follow_up.action, ProgressAction::Uncomplete);
        assert!(tracker.is_syncing("A"));

        assert_eq!(tracker.settle(&follow_up, true), SettleOutcome::default());
        assert!(!tracker.is_complete("A"));
        assert!(!tracker.is_acknowledged("A"));
    }

    #[test]
    fn queued_toggle_that_cancels_out_needs_no_follow_up() {
        let mut tracker = ProgressTracker::new(&plan(&["A"]), &ProgressMap::new());
        let first = tracker.toggle("A").unwrap().request.unwrap();
        tracker.toggle("A");
        tracker.toggle("A");
        let settled = tracker.settle(&first, true);
        assert_eq!(settled.follow_up, None);
        assert!(tracker.is_complete("A"));
    }

    #[test]
    fn stale_settlement_is_ignored() {
        let mut tracker = ProgressTracker::new(&plan(&["A"]), &ProgressMap::new());
        let bogus = SyncRequest {
            topic: "A".into(),
            action: ProgressAction::Uncomplete,
            ticket: SyncTicket::default(),
        };
        assert!(tracker.settle(&bogus, false).stale);
        let unknown = SyncRequest {
            topic: "Z".into(),
            action: ProgressAction::Complete,
            ticket: SyncTicket::default(),
        };
        assert!(tracker.settle(&unknown, true).stale);
        assert!(tracker.toggle("Z").is_none());
    }

    #[test]
    fn answer_from_an_earlier_generation_is_stale() {
        let mut earlier =
            ProgressTracker::new(&plan(&["A"]), &ProgressMap::new()).with_generation(1);
        let old = earlier.toggle("A").unwrap().request.unwrap();

        let mut tracker =
            ProgressTracker::new(&plan(&["A"]), &ProgressMap::new()).with_generation(2);
        let current = tracker.toggle("A").unwrap().request.unwrap();
        assert_eq!(old.topic, current.topic);
        assert_eq!(old.action, current.action);
        assert_ne!(old.ticket, current.ticket);

        assert!(tracker.settle(&old, false).stale);
        assert!(tracker.is_complete("A"));
        assert!(tracker.is_syncing("A"));

        assert_eq!(tracker.settle(&current, true), SettleOutcome::default());
        assert!(tracker.is_acknowledged("A"));
    }

    #[test]
    fn all_complete_fires_once_per_transition() {
        let mut tracker = ProgressTracker::new(&plan(&["A", "B"]), &ProgressMap::new());
        tracker.toggle("A");
        assert!(!tracker.recompute().all_complete);
        tracker.toggle("B");
        assert!(tracker.recompute().all_complete);
        assert!(!tracker.recompute().all_complete);
        assert!(!tracker.recompute().all_complete);

        tracker.toggle("B");
        assert!(!tracker.recompute().all_complete);
        tracker.toggle("B");
        assert!(tracker.recompute().all_complete);
    }

    #[test]
    fn loading_a_finished_session_does_not_celebrate() {
        let progress: ProgressMap = ["A", "B"].into_iter().collect();
        let mut tracker = ProgressTracker::new(&plan(&["A", "B"]), &progress);
        let result = tracker.recompute();
        assert_eq!(result.stats.percentage, 100);
        assert!(!result.all_complete);
    }

    #[test]
    fn duplicate_topics_share_one_mark() {
        let mut tracker = ProgressTracker::new(&plan(&["A", "A", "B"]), &ProgressMap::new());
        tracker.toggle("A");
        assert_eq!(tracker.stats().completed, 2);
        assert_eq!(tracker.completed_topics(), vec!["A"]);
    }
}
