use study_core::model::Session;
use study_core::{ProgressStats, ProgressTracker, Recompute, SettleOutcome, SyncRequest, ToggleOutcome};

/// The session shown on the Results panel together with its checklist.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsState {
    session: Session,
    tracker: ProgressTracker,
    stats: ProgressStats,
}

impl ResultsState {
    /// Builds the checklist; progress requests carry `generation` so answers
    /// for an earlier view of the same session are ignored.
    #[must_use]
    pub fn new(session: Session, generation: u64) -> Self {
        let mut tracker =
            ProgressTracker::new(&session.plan, &session.progress).with_generation(generation);
        let stats = tracker.recompute().stats;
        Self {
            session,
            tracker,
            stats,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Statistics as of the last recompute.
    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.stats
    }

    pub(crate) fn toggle(&mut self, topic: &str) -> Option<(ToggleOutcome, Recompute)> {
        let outcome = self.tracker.toggle(topic)?;
        Some((outcome, self.recompute()))
    }

    pub(crate) fn settle(
        &mut self,
        request: &SyncRequest,
        succeeded: bool,
    ) -> (SettleOutcome, Recompute) {
        let outcome = self.tracker.settle(request, succeeded);
        (outcome, self.recompute())
    }

    pub(crate) fn recompute(&mut self) -> Recompute {
        let recompute = self.tracker.recompute();
        self.stats = recompute.stats;
        recompute
    }
}
