use study_core::model::TraceSummary;

pub const NO_METRICS: &str = "No metrics available";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricRowVm {
    pub agent: String,
    pub status: String,
    /// CSS modifier: `success` or `failed`.
    pub status_class: &'static str,
    pub duration: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsVm {
    pub rows: Vec<MetricRowVm>,
    pub total_duration: String,
}

fn seconds(value: f64) -> String {
    format!("{value:.2}s")
}

/// `None` when the backend sent no trace data, as for resumed sessions.
#[must_use]
pub fn map_metrics(summary: &TraceSummary) -> Option<MetricsVm> {
    if summary.is_empty() {
        return None;
    }
    let rows = summary
        .traces
        .iter()
        .map(|trace| MetricRowVm {
            agent: trace.agent.clone(),
            status: trace.status.as_str().to_string(),
            status_class: if trace.status.is_success() {
                "success"
            } else {
                "failed"
            },
            duration: seconds(trace.duration.unwrap_or_default()),
        })
        .collect();
    Some(MetricsVm {
        rows,
        total_duration: seconds(summary.total_duration),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{TraceEntry, TraceStatus};

    #[test]
    fn formats_durations_with_two_decimals() {
        let summary = TraceSummary {
            total_traces: 2,
            total_duration: 4.567,
            traces: vec![
                TraceEntry {
                    agent: "StudyPlanAgent".into(),
                    function: "generate".into(),
                    status: TraceStatus::Success,
                    duration: Some(4.0),
                    error: None,
                },
                TraceEntry {
                    agent: "ResourceAgent".into(),
                    function: "search".into(),
                    status: TraceStatus::Failed,
                    duration: None,
                    error: Some("timeout".into()),
                },
            ],
        };
        let vm = map_metrics(&summary).unwrap();
        assert_eq!(vm.total_duration, "4.57s");
        assert_eq!(vm.rows[0].duration, "4.00s");
        assert_eq!(vm.rows[1].status_class, "failed");
        assert_eq!(vm.rows[1].duration, "0.00s");
    }

    #[test]
    fn empty_summary_has_no_metrics() {
        assert_eq!(map_metrics(&TraceSummary::default()), None);
    }
}
