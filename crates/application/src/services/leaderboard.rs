//! Leaderboard ranking.

use crate::ApplicationResult;
use chrono::NaiveDateTime;
use leaderboard_domain::{Evaluator, MetricSet};
use leaderboard_infrastructure::{ScoredSubmission, SubmissionManager};
use serde::Serialize;
use tracing::{debug, instrument};

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: usize,
    pub participant: String,
    pub submission_name: String,
    pub submitted_at: NaiveDateTime,
    pub metrics: MetricSet,
}

impl LeaderboardEntry {
    /// Primary score shown in the table.
    pub fn score(&self) -> Option<f64> {
        self.metrics.primary_value()
    }
}

/// Rank each participant's best submission.
///
/// Better results come first; equal results are ordered by earlier
/// submission time, then by participant name. `top_k` truncates after ranking.
pub fn rank_entries(
    best_results: Vec<(String, ScoredSubmission)>,
    top_k: Option<usize>,
) -> Vec<LeaderboardEntry> {
    let mut best_results = best_results;
    best_results.sort_by(|(name_a, a), (name_b, b)| {
        b.metrics
            .cmp(&a.metrics)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
            .then_with(|| name_a.cmp(name_b))
    });

    let limit = top_k.unwrap_or(usize::MAX);
    best_results
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (participant, best))| LeaderboardEntry {
            rank: index + 1,
            participant,
            submission_name: best.submission_name,
            submitted_at: best.submitted_at,
            metrics: best.metrics,
        })
        .collect()
}

/// Refresh every participant's results and build the ranked leaderboard.
///
/// Participants without any scored submission are left out.
#[instrument(skip_all, fields(top_k = ?top_k))]
pub fn build_leaderboard(
    manager: &mut SubmissionManager,
    evaluator: &dyn Evaluator,
    top_k: Option<usize>,
) -> ApplicationResult<Vec<LeaderboardEntry>> {
    let mut best_results = Vec::new();
    for participant in manager.participants_mut() {
        participant.update_results(evaluator)?;
        if let Some(best) = participant.get_best_result() {
            best_results.push((participant.name().to_string(), best));
        }
    }

    let entries = rank_entries(best_results, top_k);
    debug!(entries = entries.len(), "leaderboard built");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_domain::Metric;
    use leaderboard_testing::timestamp;

    fn best(participant: &str, score: f64, secs: i64) -> (String, ScoredSubmission) {
        (
            participant.to_string(),
            ScoredSubmission {
                path: format!("/{participant}/{secs}.json").into(),
                submission_name: format!("{participant}-{secs}"),
                submitted_at: timestamp(secs),
                metrics: MetricSet::single(Metric::higher_is_better("score", score)),
            },
        )
    }

    #[test]
    fn test_rank_ties_broken_by_time() {
        let entries = rank_entries(
            vec![best("C", 0.7, 5), best("B", 0.9, 20), best("A", 0.9, 10)],
            None,
        );
        let order: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.participant.as_str(), e.rank))
            .collect();
        assert_eq!(order, vec![("A", 1), ("B", 2), ("C", 3)]);
    }

    #[test]
    fn test_rank_is_deterministic_for_identical_results() {
        let entries = rank_entries(vec![best("zed", 0.5, 1), best("amy", 0.5, 1)], None);
        assert_eq!(entries[0].participant, "amy");
    }

    #[test]
    fn test_top_k_truncates() {
        let entries = rank_entries(
            vec![best("a", 0.1, 1), best("b", 0.2, 1), best("c", 0.3, 1)],
            Some(2),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].participant, "c");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn test_lower_is_better_ranking() {
        let loss = |name: &str, value: f64| {
            let (participant, mut submission) = best(name, 0.0, 1);
            submission.metrics = MetricSet::single(Metric::lower_is_better("loss", value));
            (participant, submission)
        };
        let entries = rank_entries(vec![loss("a", 0.4), loss("b", 0.1)], None);
        assert_eq!(entries[0].participant, "b");
        assert_eq!(entries[0].score(), Some(0.1));
    }
}
