mod ids;
mod plan;
mod progress;
mod request;
mod session;
mod trace;

pub use ids::{IdError, SessionId, UserId};
pub use plan::{
    PlanEntry, StudyPlan, UNKNOWN_SLOT, UNTITLED_TOPIC, parse_plan_text, parse_stored_plan,
    strip_code_fences,
};
pub use progress::{
    CompletionMarker, ProgressAction, ProgressMap, ProgressSnapshot, completion_percentage,
};
pub use request::{Difficulty, GenerateRequest, PlanForm, PlanRequestError};
pub use session::{Session, SessionListItem, parse_timestamp, sort_most_recent_first};
pub use trace::{TraceEntry, TraceStatus, TraceSummary};
