use std::fmt::Write as _;

use study_core::model::{Session, SessionId, StudyPlan};

use crate::vm::content_vm::rich_text_to_markdown;
use crate::vm::plan_vm::NO_PLAN_DATA;

#[must_use]
pub fn export_file_name(session: &SessionId) -> String {
    format!("study_plan_{session}.md")
}

#[must_use]
pub fn plan_markdown(plan: &StudyPlan) -> String {
    if plan.is_empty() {
        return format!("{NO_PLAN_DATA}\n");
    }
    let mut out = String::new();
    for (day, entries) in plan.group_by_day() {
        let _ = writeln!(out, "## Day {day}\n");
        for entry in entries {
            let _ = writeln!(out, "### {} - {}\n", entry.time_slot, entry.topic);
            if let Some(description) = entry.description.as_deref().map(str::trim)
                && !description.is_empty()
            {
                let _ = writeln!(out, "*{description}*\n");
            }
            if !entry.activities.is_empty() {
                out.push_str("**Activities:**\n");
                for activity in &entry.activities {
                    let _ = writeln!(out, "- {}", activity.trim());
                }
                out.push('\n');
            }
            if let Some(outcome) = entry.expected_outcome.as_deref().map(str::trim)
                && !outcome.is_empty()
            {
                let _ = writeln!(out, "**Expected Outcome:** {outcome}\n");
            }
            out.push_str("---\n\n");
        }
    }
    out
}

/// The markdown document written by the export action.
#[must_use]
pub fn export_markdown(session: &Session) -> String {
    let mut out = String::from("# Study Plan Export\n\n");
    let _ = writeln!(out, "**Session ID:** {}\n", session.id);
    out.push_str("---\n\n## Study Plan\n\n");
    out.push_str(&plan_markdown(&session.plan));
    out.push_str("\n## Study Notes\n\n");
    out.push_str(&rich_text_to_markdown(&session.notes));
    out.push_str("\n## Learning Resources\n\n");
    out.push_str(&rich_text_to_markdown(&session.resources));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{PlanEntry, ProgressMap, TraceSummary, UserId};

    fn session(plan: StudyPlan) -> Session {
        Session {
            id: SessionId::new("ada_20240101_090000").unwrap(),
            user_id: UserId::new("ada").unwrap(),
            syllabus: "Rust".into(),
            difficulty: "beginner".into(),
            plan,
            notes: "<h2>Ownership</h2><p>Moves transfer ownership.</p>".into(),
            resources: "- The Rust Book".into(),
            notes_file: "N/A".into(),
            progress: ProgressMap::new(),
            trace_summary: TraceSummary::default(),
        }
    }

    #[test]
    fn file_name_uses_session_id() {
        let id = SessionId::new("ada_1").unwrap();
        assert_eq!(export_file_name(&id), "study_plan_ada_1.md");
    }

    #[test]
    fn plan_sections_follow_day_order() {
        let plan = StudyPlan::new(vec![
            PlanEntry::new(2, "10:00", "Traits"),
            PlanEntry::new(1, "09:00 - 10:00", "Syntax")
                .with_description("Basics")
                .with_activities(["Read chapter 3"])
                .with_expected_outcome("Write a loop"),
        ]);
        let markdown = plan_markdown(&plan);
        let expected = "## Day 1\n\n### 09:00 - 10:00 - Syntax\n\n*Basics*\n\n**Activities:**\n- Read chapter 3\n\n**Expected Outcome:** Write a loop\n\n---\n\n## Day 2\n\n### 10:00 - Traits\n\n---\n\n";
        assert_eq!(markdown, expected);
    }

    #[test]
    fn document_has_all_sections() {
        let doc = export_markdown(&session(StudyPlan::new(vec![PlanEntry::new(
            1, "09:00", "Syntax",
        )])));
        assert!(doc.starts_with("# Study Plan Export\n\n**Session ID:** ada_20240101_090000\n\n---\n\n## Study Plan\n\n## Day 1"));
        let notes = doc.find("## Study Notes").unwrap();
        let resources = doc.find("## Learning Resources").unwrap();
        assert!(notes < resources);
        assert!(doc[notes..resources].contains("Moves transfer ownership."));
        assert!(doc.ends_with("- The Rust Book\n"));
    }

    #[test]
    fn empty_plan_exports_placeholder() {
        let doc = export_markdown(&session(StudyPlan::default()));
        assert!(doc.contains("## Study Plan\n\nNo plan data available\n"));
    }
}
