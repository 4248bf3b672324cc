mod driver;
mod feedback;
mod history;
mod loading;
mod plan_form;
mod results;
mod shell;
mod user_select;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use driver::{Driver, FeedbackItem, FeedbackKind, FeedbackLog, use_driver};
pub use feedback::{CelebrationOverlay, FeedbackBar};
pub use history::HistoryPanel;
pub use loading::LoadingPanel;
pub use plan_form::PlanFormPanel;
pub use results::ResultsPanel;
pub use shell::StudyShell;
pub use user_select::UserSelectPanel;
