//! Per-participant progress series.

use crate::ApplicationResult;
use chrono::NaiveDateTime;
use leaderboard_domain::{Evaluator, MetricSet};
use leaderboard_infrastructure::ParticipantSubmissions;
use serde::Serialize;

/// One scored submission on the progress chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub submission_name: String,
    pub submitted_at: NaiveDateTime,
    pub score: Option<f64>,
    pub metrics: MetricSet,
}

/// Every scored submission of one participant, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSeries {
    pub participant: String,
    pub metric_names: Vec<String>,
    pub points: Vec<ProgressPoint>,
}

/// Refresh a participant's results and collect the progress series.
pub fn build_progress(
    participant: &mut ParticipantSubmissions,
    evaluator: &dyn Evaluator,
) -> ApplicationResult<ProgressSeries> {
    participant.update_results(evaluator)?;

    let points = participant
        .scored_submissions()
        .into_iter()
        .map(|scored| ProgressPoint {
            submission_name: scored.submission_name,
            submitted_at: scored.submitted_at,
            score: scored.metrics.primary_value(),
            metrics: scored.metrics,
        })
        .collect();

    Ok(ProgressSeries {
        participant: participant.name().to_string(),
        metric_names: evaluator.metrics().into_iter().map(|m| m.name).collect(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_testing::{timestamp, write_sidecar, TestSubmissionsDir};

    #[test]
    fn test_progress_sorted_by_time() {
        let dir = TestSubmissionsDir::new();
        let alice = dir.participant_dir("alice");
        write_sidecar(&alice, "third", timestamp(300), Some(0.9));
        write_sidecar(&alice, "first", timestamp(100), Some(0.1));
        write_sidecar(&alice, "unscored", timestamp(150), None);
        write_sidecar(&alice, "second", timestamp(200), Some(0.4));

        let mut participant = ParticipantSubmissions::open(alice).unwrap();
        let series =
            build_progress(&mut participant, &leaderboard_domain::TotalScoreEvaluator::new()).unwrap();

        let names: Vec<&str> = series.points.iter().map(|p| p.submission_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(series.points[2].score, Some(0.9));
        assert_eq!(series.metric_names, vec!["score"]);
        assert_eq!(series.participant, "alice");
    }
}
