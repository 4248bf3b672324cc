mod content_vm;
mod export_vm;
mod metrics_vm;
mod plan_vm;
mod progress_vm;
mod session_list_vm;
mod time_fmt;

pub use content_vm::{
    looks_like_html, markdown_to_html, normalize_markdown, render_rich_text,
    rich_text_to_markdown, sanitize_html,
};
pub use export_vm::{export_file_name, export_markdown, plan_markdown};
pub use metrics_vm::{MetricRowVm, MetricsVm, NO_METRICS, map_metrics};
pub use plan_vm::{DayScheduleVm, NO_PLAN_DATA, PlanCardVm, PlanRowVm, PlanVm, map_plan};
pub use progress_vm::{ChecklistItemVm, ProgressStatsVm, map_checklist};
pub use session_list_vm::{SessionCardVm, map_session_cards};
pub use time_fmt::{format_date, format_session_date};
