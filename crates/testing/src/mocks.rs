//! Mock implementations of the evaluator, row scorer and login seams.

use leaderboard_domain::{
    EvaluationError, Evaluator, LoginProvider, MetricDescriptor, MetricSet, RowScorer, RowScores,
    TotalScoreEvaluator,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Evaluator that scores like [`TotalScoreEvaluator`] and records every call.
#[derive(Clone)]
pub struct CountingEvaluator {
    inner: TotalScoreEvaluator,
    evaluated: Arc<RwLock<Vec<PathBuf>>>,
    accept_uploads: bool,
}

impl CountingEvaluator {
    pub fn new() -> Self {
        Self {
            inner: TotalScoreEvaluator::new(),
            evaluated: Arc::new(RwLock::new(Vec::new())),
            accept_uploads: true,
        }
    }

    /// An evaluator whose `validate_submission` always fails.
    pub fn rejecting() -> Self {
        Self {
            accept_uploads: false,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.evaluated.read().len()
    }

    pub fn evaluated_paths(&self) -> Vec<PathBuf> {
        self.evaluated.read().clone()
    }

    pub fn clear(&self) {
        self.evaluated.write().clear();
    }
}

impl Default for CountingEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for CountingEvaluator {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        self.inner.metrics()
    }

    fn evaluate(&self, path: &Path) -> Result<Option<MetricSet>, EvaluationError> {
        self.evaluated.write().push(path.to_path_buf());
        self.inner.evaluate(path)
    }

    fn validate_submission(&self, contents: &[u8]) -> bool {
        self.accept_uploads && self.inner.validate_submission(contents)
    }
}

/// Row scorer returning the same scores for every row.
pub struct FixedRowScorer {
    scores: RowScores,
    fail_at: Option<usize>,
    calls: Arc<RwLock<usize>>,
}

impl FixedRowScorer {
    pub fn new(scores: RowScores) -> Self {
        Self {
            scores,
            fail_at: None,
            calls: Arc::new(RwLock::new(0)),
        }
    }

    /// Fail when scoring the row at `index` (0-based).
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.read()
    }
}

impl RowScorer for FixedRowScorer {
    fn score_row(&self, _row: &BTreeMap<String, String>) -> Result<RowScores, EvaluationError> {
        let index = {
            let mut calls = self.calls.write();
            *calls += 1;
            *calls - 1
        };
        if self.fail_at == Some(index) {
            return Err(EvaluationError::Malformed(format!("row {index} could not be scored")));
        }
        Ok(self.scores.clone())
    }
}

/// Login provider with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct StaticLogin {
    pub username: Option<String>,
    pub access_allowed: bool,
    pub signed_out: bool,
}

impl StaticLogin {
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            access_allowed: true,
            signed_out: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_out(username: impl Into<String>) -> Self {
        Self {
            signed_out: true,
            ..Self::signed_in(username)
        }
    }
}

impl LoginProvider for StaticLogin {
    fn is_access_allowed(&self) -> bool {
        self.access_allowed
    }

    fn get_username(&self) -> Option<String> {
        self.username.clone()
    }

    fn has_signed_out(&self) -> bool {
        self.signed_out
    }
}
