//! Panel state machine for the study client.
//!
//! `ViewController` owns every piece of client state. It never performs I/O:
//! `dispatch` returns the visible panel plus the effects to execute, and
//! completions come back as events tagged with the `RequestId` they answer.
//! A completion whose id is not the pending one is stale and ignored.

mod event;
mod results;

use std::time::Duration;

use study_core::SyncRequest;
use study_core::model::{
    GenerateRequest, PlanForm, ProgressSnapshot, Session, SessionId, SessionListItem, UserId,
};

use crate::vm::{export_file_name, export_markdown};

pub use event::{Celebration, Effect, RequestId, Transition, ViewEvent};
pub use results::ResultsState;

pub const EMPTY_USER_ALERT: &str = "Please enter your name to view your study history";
pub const HISTORY_FAILED_ALERT: &str = "Failed to load your sessions. Please try again.";
pub const RESUME_FAILED_ALERT: &str = "Failed to load session. Please try again.";
pub const ALL_COMPLETE_NOTICE: &str =
    "Congratulations! You've completed your entire study plan!";

/// Mutually exclusive top-level views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    UserSelect,
    History,
    Input,
    Loading,
    Results,
}

/// Who is using the client and which session is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub user: UserId,
    pub session: Option<SessionId>,
}

impl SessionContext {
    #[must_use]
    pub fn for_user(user: UserId) -> Self {
        Self {
            user,
            session: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum HistoryStatus {
    #[default]
    Loading,
    Ready(Vec<SessionListItem>),
    /// No sessions; the form opens after a delay.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingKind {
    Generate,
    Resume,
}

impl LoadingKind {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Generate => "Generating your personalized study plan...",
            Self::Resume => "Loading your study session...",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    History(RequestId),
    EmptyRedirect(RequestId),
    Load(RequestId, LoadingKind),
}

impl Pending {
    fn id(self) -> RequestId {
        match self {
            Self::History(id) | Self::EmptyRedirect(id) | Self::Load(id, _) => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewController {
    panel: Panel,
    default_user: UserId,
    empty_history_delay: Duration,
    context: Option<SessionContext>,
    last_request: RequestId,
    pending: Option<Pending>,
    history: HistoryStatus,
    form: PlanForm,
    results: Option<ResultsState>,
}

impl ViewController {
    #[must_use]
    pub fn new(default_user: UserId, empty_history_delay: Duration) -> Self {
        Self {
            panel: Panel::UserSelect,
            default_user,
            empty_history_delay,
            context: None,
            last_request: RequestId::FIRST,
            pending: None,
            history: HistoryStatus::default(),
            form: PlanForm::default(),
            results: None,
        }
    }

    #[must_use]
    pub fn panel(&self) -> Panel {
        self.panel
    }

    #[must_use]
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStatus {
        &self.history
    }

    /// Last submitted form values, used to refill the form after a failure.
    #[must_use]
    pub fn form(&self) -> &PlanForm {
        &self.form
    }

    #[must_use]
    pub fn results(&self) -> Option<&ResultsState> {
        self.results.as_ref()
    }

    #[must_use]
    pub fn default_user(&self) -> &UserId {
        &self.default_user
    }

    #[must_use]
    pub fn loading_kind(&self) -> Option<LoadingKind> {
        match self.pending {
            Some(Pending::Load(_, kind)) if self.panel == Panel::Loading => Some(kind),
            _ => None,
        }
    }

    /// Generation in flight: the form stays mounted behind the loading panel
    /// with its submit control disabled.
    #[must_use]
    pub fn is_submit_disabled(&self) -> bool {
        self.loading_kind() == Some(LoadingKind::Generate)
    }

    pub fn dispatch(&mut self, event: ViewEvent) -> Transition {
        let effects = match event {
            ViewEvent::LoadHistory { user } => self.load_history(&user),
            ViewEvent::HistoryLoaded { request, sessions } => {
                self.history_loaded(request, sessions)
            }
            ViewEvent::HistoryFailed { request, message } => {
                self.history_failed(request, &message)
            }
            ViewEvent::EmptyHistoryElapsed { request } => self.empty_history_elapsed(request),
            ViewEvent::NewSession => self.new_session(),
            ViewEvent::Submit(form) => self.submit(form),
            ViewEvent::Generated { request, session } => {
                self.show_session(request, *session, LoadingKind::Generate)
            }
            ViewEvent::GenerateFailed { request, message } => {
                self.generate_failed(request, &message)
            }
            ViewEvent::ResumeSelected(session) => self.resume(session),
            ViewEvent::Resumed { request, session } => {
                self.show_session(request, *session, LoadingKind::Resume)
            }
            ViewEvent::ResumeFailed { request, message } => self.resume_failed(request, &message),
            ViewEvent::BackToSessions => self.back_to_sessions(),
            ViewEvent::ChangeUser => {
                self.reset_to_user_select();
                Vec::new()
            }
            ViewEvent::ToggleTopic(topic) => self.toggle_topic(&topic),
            ViewEvent::ProgressSynced {
                session,
                request,
                result,
            } => self.progress_synced(&session, &request, result),
            ViewEvent::RefreshProgress => self.refresh_progress(),
            ViewEvent::Export => self.export(),
            ViewEvent::ExportFinished { result } => match result {
                Ok(path) => vec![Effect::Notice(format!(
                    "Study plan exported to {}",
                    path.display()
                ))],
                Err(message) => vec![Effect::Alert(format!("Export failed: {message}"))],
            },
        };
        Transition {
            panel: self.panel,
            effects,
        }
    }

    fn issue(&mut self) -> RequestId {
        self.last_request = self.last_request.next();
        self.last_request
    }

    /// Takes the pending request if `request` answers it.
    fn answer(&mut self, request: RequestId, expected: impl Fn(Pending) -> bool) -> Option<Pending> {
        match self.pending {
            Some(pending) if pending.id() == request && expected(pending) => self.pending.take(),
            _ => {
                tracing::debug!(%request, pending = ?self.pending, "ignoring stale completion");
                None
            }
        }
    }

    fn reset_to_user_select(&mut self) {
        self.panel = Panel::UserSelect;
        self.context = None;
        self.pending = None;
        self.results = None;
        self.history = HistoryStatus::default();
    }

    fn load_history(&mut self, raw_user: &str) -> Vec<Effect> {
        let Ok(user) = UserId::new(raw_user) else {
            return vec![Effect::Alert(EMPTY_USER_ALERT.to_string())];
        };
        self.fetch_history(user)
    }

    fn fetch_history(&mut self, user: UserId) -> Vec<Effect> {
        let request = self.issue();
        tracing::info!(user = %user, %request, "loading history");
        self.panel = Panel::History;
        self.history = HistoryStatus::Loading;
        self.pending = Some(Pending::History(request));
        self.results = None;
        self.context = Some(SessionContext::for_user(user.clone()));
        vec![Effect::FetchHistory { request, user }]
    }

    fn history_loaded(&mut self, request: RequestId, sessions: Vec<SessionListItem>) -> Vec<Effect> {
        if self.answer(request, |p| matches!(p, Pending::History(_))).is_none() {
            return Vec::new();
        }
        if !sessions.is_empty() {
            self.history = HistoryStatus::Ready(sessions);
            return Vec::new();
        }
        self.history = HistoryStatus::Empty;
        let redirect = self.issue();
        self.pending = Some(Pending::EmptyRedirect(redirect));
        vec![Effect::ScheduleEmptyRedirect {
            request: redirect,
            delay: self.empty_history_delay,
        }]
    }

    fn history_failed(&mut self, request: RequestId, message: &str) -> Vec<Effect> {
        if self.answer(request, |p| matches!(p, Pending::History(_))).is_none() {
            return Vec::new();
        }
        tracing::warn!(error = message, "history fetch failed");
        self.reset_to_user_select();
        vec![Effect::Alert(HISTORY_FAILED_ALERT.to_string())]
    }

    fn empty_history_elapsed(&mut self, request: RequestId) -> Vec<Effect> {
        if self
            .answer(request, |p| matches!(p, Pending::EmptyRedirect(_)))
            .is_some()
            && self.panel == Panel::History
        {
            self.panel = Panel::Input;
        }
        Vec::new()
    }

    fn new_session(&mut self) -> Vec<Effect> {
        if self.panel == Panel::Loading {
            return Vec::new();
        }
        self.pending = None;
        self.panel = Panel::Input;
        Vec::new()
    }

    fn submit(&mut self, form: PlanForm) -> Vec<Effect> {
        if self.panel != Panel::Input {
            tracing::debug!(panel = ?self.panel, "ignoring submit outside the form");
            return Vec::new();
        }
        let validated = GenerateRequest::from_form(&form, &self.default_user);
        self.form = form;
        let payload = match validated {
            Ok(payload) => payload,
            Err(err) => return vec![Effect::Alert(err.to_string())],
        };

        let request = self.issue();
        self.panel = Panel::Loading;
        self.pending = Some(Pending::Load(request, LoadingKind::Generate));
        self.context = Some(SessionContext::for_user(payload.user_id.clone()));
        vec![Effect::Generate { request, payload }]
    }

    fn generate_failed(&mut self, request: RequestId, message: &str) -> Vec<Effect> {
        if self
            .answer(request, |p| matches!(p, Pending::Load(_, LoadingKind::Generate)))
            .is_none()
        {
            return Vec::new();
        }
        tracing::warn!(error = message, "plan generation failed");
        self.panel = Panel::Input;
        vec![Effect::Alert(format!(
            "Failed to generate study plan: {message}"
        ))]
    }

    fn resume(&mut self, session: SessionId) -> Vec<Effect> {
        if self.panel != Panel::History {
            return Vec::new();
        }
        let Some(context) = self.context.as_mut() else {
            return vec![Effect::Alert(EMPTY_USER_ALERT.to_string())];
        };
        context.session = None;
        let user = context.user.clone();
        let request = self.issue();
        self.panel = Panel::Loading;
        self.pending = Some(Pending::Load(request, LoadingKind::Resume));
        vec![Effect::FetchSession {
            request,
            session,
            user,
        }]
    }

    fn resume_failed(&mut self, request: RequestId, message: &str) -> Vec<Effect> {
        if self
            .answer(request, |p| matches!(p, Pending::Load(_, LoadingKind::Resume)))
            .is_none()
        {
            return Vec::new();
        }
        tracing::warn!(error = message, "resume failed");
        self.panel = Panel::History;
        vec![Effect::Alert(RESUME_FAILED_ALERT.to_string())]
    }

    fn show_session(&mut self, request: RequestId, session: Session, kind: LoadingKind) -> Vec<Effect> {
        if self
            .answer(request, |p| p == Pending::Load(request, kind))
            .is_none()
        {
            return Vec::new();
        }
        let context = self
            .context
            .get_or_insert_with(|| SessionContext::for_user(session.user_id.clone()));
        context.session = Some(session.id.clone());
        tracing::info!(session = %session.id, topics = session.total_topics(), "showing results");
        self.results = Some(ResultsState::new(session, request.value()));
        self.panel = Panel::Results;
        Vec::new()
    }

    fn back_to_sessions(&mut self) -> Vec<Effect> {
        if self.panel == Panel::Loading {
            return Vec::new();
        }
        match self.context.as_ref().map(|context| context.user.clone()) {
            Some(user) => self.fetch_history(user),
            None => {
                self.reset_to_user_select();
                Vec::new()
            }
        }
    }

    fn open_session(&self) -> Option<(SessionId, UserId)> {
        let context = self.context.as_ref()?;
        Some((context.session.clone()?, context.user.clone()))
    }

    fn toggle_topic(&mut self, topic: &str) -> Vec<Effect> {
        if self.panel != Panel::Results {
            return Vec::new();
        }
        let Some((session, user)) = self.open_session() else {
            return Vec::new();
        };
        let Some(results) = self.results.as_mut() else {
            return Vec::new();
        };
        let Some((outcome, recompute)) = results.toggle(topic) else {
            tracing::debug!(topic, "toggle for unknown topic");
            return Vec::new();
        };

        let mut effects = Vec::new();
        if outcome.completed {
            effects.push(Effect::Celebrate(Celebration::Topic(topic.to_string())));
        }
        if recompute.all_complete {
            effects.push(Effect::Celebrate(Celebration::AllComplete));
            effects.push(Effect::Notice(ALL_COMPLETE_NOTICE.to_string()));
        }
        if let Some(request) = outcome.request {
            effects.push(Effect::SyncProgress {
                session,
                user,
                request,
            });
        }
        effects
    }

    fn progress_synced(
        &mut self,
        session: &SessionId,
        request: &SyncRequest,
        result: Result<Option<ProgressSnapshot>, String>,
    ) -> Vec<Effect> {
        let Some((open, user)) = self.open_session() else {
            return Vec::new();
        };
        let Some(results) = self.results.as_mut().filter(|_| &open == session) else {
            tracing::debug!(session = %session, "ignoring progress ack for a closed session");
            return Vec::new();
        };

        let succeeded = result.is_ok();
        let (outcome, recompute) = results.settle(request, succeeded);
        if outcome.stale {
            tracing::debug!(topic = %request.topic, "ignoring stale progress ack");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match result {
            Ok(Some(stats)) => tracing::info!(
                session = %session,
                completed = stats.completed_count,
                total = stats.total_topics,
                percentage = stats.completion_percentage,
                "progress saved"
            ),
            Ok(None) => {}
            Err(message) => {
                if outcome.rolled_back {
                    tracing::warn!(topic = %request.topic, error = %message, "rolled back toggle");
                }
                effects.push(Effect::Alert(format!(
                    "Failed to update progress for \"{}\": {message}",
                    request.topic
                )));
            }
        }
        if recompute.all_complete {
            effects.push(Effect::Celebrate(Celebration::AllComplete));
            effects.push(Effect::Notice(ALL_COMPLETE_NOTICE.to_string()));
        }
        if let Some(follow_up) = outcome.follow_up {
            effects.push(Effect::SyncProgress {
                session: open,
                user,
                request: follow_up,
            });
        }
        effects
    }

    fn refresh_progress(&mut self) -> Vec<Effect> {
        if let Some(results) = self.results.as_mut() {
            results.recompute();
        }
        Vec::new()
    }

    fn export(&self) -> Vec<Effect> {
        let Some(results) = self.results.as_ref().filter(|_| self.panel == Panel::Results) else {
            return Vec::new();
        };
        let session = results.session();
        vec![Effect::WriteExport {
            file_name: export_file_name(&session.id),
            contents: export_markdown(session),
        }]
    }
}
