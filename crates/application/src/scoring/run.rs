use super::UploadRow;
use crate::{ApplicationError, ApplicationResult};
use leaderboard_domain::{RowScorer, RowScores, SidecarResult};
use tracing::debug;

/// Progress of a scoring run after one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProgress {
    /// 0-based index of the row just scored
    pub index: usize,
    /// Number of rows in the upload
    pub total: usize,
    /// Scores of that row
    pub scores: RowScores,
}

impl ScoringProgress {
    /// Fraction of rows done, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.index + 1) as f64 / self.total as f64
        }
    }
}

/// Scores uploaded rows one at a time, in upload order.
///
/// Iterating yields one [`ScoringProgress`] per row. The first failure is
/// yielded as an error and ends the run. [`finish`](Self::finish) drives any
/// remaining rows and aggregates the result.
pub struct ScoringRun<'a> {
    rows: std::vec::IntoIter<UploadRow>,
    total: usize,
    scorer: &'a dyn RowScorer,
    metric_keys: &'a [String],
    scored: Vec<RowScores>,
    failure: Option<ApplicationError>,
}

impl<'a> ScoringRun<'a> {
    pub fn new(rows: Vec<UploadRow>, scorer: &'a dyn RowScorer, metric_keys: &'a [String]) -> Self {
        Self {
            total: rows.len(),
            rows: rows.into_iter(),
            scorer,
            metric_keys,
            scored: Vec::new(),
            failure: None,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Score the remaining rows and aggregate every row score.
    pub fn finish(mut self) -> ApplicationResult<SidecarResult> {
        for step in self.by_ref() {
            step?;
        }
        if let Some(err) = self.failure {
            return Err(err);
        }

        let result = SidecarResult::from_rows(self.scored, self.metric_keys);
        if !result.total_score.is_finite() {
            return Err(ApplicationError::ValidationFailed(
                "Submission scores do not add up to a finite total".to_string(),
            ));
        }
        debug!(rows = self.total, total_score = result.total_score, "scoring run finished");
        Ok(result)
    }
}

impl Iterator for ScoringRun<'_> {
    type Item = ApplicationResult<ScoringProgress>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() {
            return None;
        }

        let row = self.rows.next()?;
        let index = self.scored.len();
        match self.scorer.score_row(&row) {
            Ok(scores) => {
                self.scored.push(scores.clone());
                Some(Ok(ScoringProgress {
                    index,
                    total: self.total,
                    scores,
                }))
            }
            Err(err) => {
                let failure = ApplicationError::ValidationFailed(format!(
                    "Row {} of {} could not be scored: {err}",
                    index + 1,
                    self.total
                ));
                self.failure = Some(failure.clone());
                Some(Err(failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ColumnRowScorer;
    use std::collections::BTreeMap;

    struct ConstantScorer(f64);

    impl RowScorer for ConstantScorer {
        fn score_row(
            &self,
            _row: &BTreeMap<String, String>,
        ) -> Result<RowScores, leaderboard_domain::EvaluationError> {
            Ok(RowScores::from([("score".to_string(), self.0)]))
        }
    }

    fn rows(values: &[&str]) -> Vec<UploadRow> {
        values
            .iter()
            .map(|v| UploadRow::from([("score".to_string(), v.to_string())]))
            .collect()
    }

    #[test]
    fn test_progress_is_in_order() {
        let keys = vec!["score".to_string()];
        let scorer = ColumnRowScorer::new(keys.clone());
        let run = ScoringRun::new(rows(&["1", "2", "3"]), &scorer, &keys);
        assert_eq!(run.total(), 3);

        let steps: Vec<ScoringProgress> = run.map(Result::unwrap).collect();
        assert_eq!(steps.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(steps[1].scores["score"], 2.0);
        assert_eq!(steps[2].fraction(), 1.0);
    }

    #[test]
    fn test_finish_aggregates() {
        let keys = vec!["score".to_string()];
        let scorer = ColumnRowScorer::new(keys.clone());
        let mut run = ScoringRun::new(rows(&["1", "2", "2"]), &scorer, &keys);
        run.next();

        let result = run.finish().unwrap();
        assert_eq!(result.scores.len(), 3);
        assert_eq!(result.average_score["score"], 1.667);
        assert_eq!(result.total_score, 1.667);
    }

    #[test]
    fn test_failure_stops_the_run() {
        let keys = vec!["score".to_string()];
        let scorer = ColumnRowScorer::new(keys.clone());
        let mut run = ScoringRun::new(rows(&["1", "oops", "3"]), &scorer, &keys);

        assert!(run.next().unwrap().is_ok());
        let err = run.next().unwrap().unwrap_err();
        assert!(err.to_string().starts_with("Row 2 of 3"));
        assert!(run.next().is_none());
    }

    #[test]
    fn test_finish_reports_failure() {
        let keys = vec!["score".to_string()];
        let scorer = ColumnRowScorer::new(keys.clone());
        let run = ScoringRun::new(rows(&["x"]), &scorer, &keys);
        assert!(matches!(run.finish(), Err(ApplicationError::ValidationFailed(_))));
    }

    #[test]
    fn test_non_finite_total_is_rejected() {
        let keys = vec!["score".to_string()];
        let scorer = ConstantScorer(f64::MAX);
        let run = ScoringRun::new(rows(&["a", "b"]), &scorer, &keys);
        let err = run.finish().unwrap_err();
        assert!(err.to_string().contains("finite"));

        let scorer = ConstantScorer(f64::NAN);
        let run = ScoringRun::new(rows(&["a"]), &scorer, &keys);
        assert!(matches!(run.finish(), Err(ApplicationError::ValidationFailed(_))));
    }
}
