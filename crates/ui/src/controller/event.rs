use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use study_core::SyncRequest;
use study_core::model::{
    GenerateRequest, PlanForm, ProgressSnapshot, Session, SessionId, SessionListItem, UserId,
};

use super::Panel;

/// Token tying an asynchronous completion to the request that started it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub(crate) const FIRST: Self = Self(0);

    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// User actions and task completions fed into `ViewController::dispatch`.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    LoadHistory { user: String },
    HistoryLoaded {
        request: RequestId,
        sessions: Vec<SessionListItem>,
    },
    HistoryFailed { request: RequestId, message: String },
    EmptyHistoryElapsed { request: RequestId },
    NewSession,
    Submit(PlanForm),
    Generated {
        request: RequestId,
        session: Box<Session>,
    },
    GenerateFailed { request: RequestId, message: String },
    ResumeSelected(SessionId),
    Resumed {
        request: RequestId,
        session: Box<Session>,
    },
    ResumeFailed { request: RequestId, message: String },
    BackToSessions,
    ChangeUser,
    ToggleTopic(String),
    ProgressSynced {
        session: SessionId,
        request: SyncRequest,
        result: Result<Option<ProgressSnapshot>, String>,
    },
    RefreshProgress,
    Export,
    ExportFinished { result: Result<PathBuf, String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Celebration {
    Topic(String),
    AllComplete,
}

/// Work requested by a transition.
///
/// Task effects are executed by `EffectRunner`; feedback effects are shown by
/// the view layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    FetchHistory { request: RequestId, user: UserId },
    ScheduleEmptyRedirect { request: RequestId, delay: Duration },
    Generate {
        request: RequestId,
        payload: GenerateRequest,
    },
    FetchSession {
        request: RequestId,
        session: SessionId,
        user: UserId,
    },
    SyncProgress {
        session: SessionId,
        user: UserId,
        request: SyncRequest,
    },
    WriteExport { file_name: String, contents: String },
    Alert(String),
    Notice(String),
    Celebrate(Celebration),
}

impl Effect {
    #[must_use]
    pub fn is_feedback(&self) -> bool {
        matches!(self, Self::Alert(_) | Self::Notice(_) | Self::Celebrate(_))
    }
}

/// Result of one dispatch: the panel now visible and the effects to run.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub panel: Panel,
    pub effects: Vec<Effect>,
}
