//! Evaluators turn a stored submission into a [`MetricSet`].
//!
//! The evaluator is chosen at startup and shared across requests, so
//! implementations must be `Send + Sync` and deterministic in file contents.

use crate::errors::EvaluationError;
use crate::metric::{MetricDescriptor, MetricSet};
use crate::submission::{RowScores, SIDECAR_EXTENSION};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scores stored submissions.
pub trait Evaluator: Send + Sync {
    /// Name used to select this evaluator in configuration
    fn name(&self) -> &'static str;

    /// Descriptors of the metrics, in the order they appear in a [`MetricSet`]
    fn metrics(&self) -> Vec<MetricDescriptor>;

    /// Score a stored submission.
    ///
    /// Returns `Ok(None)` when the file is not something this evaluator
    /// scores, or when it holds no result.
    fn evaluate(&self, path: &Path) -> Result<Option<MetricSet>, EvaluationError>;

    /// Check that uploaded bytes could be evaluated. Never fails.
    fn validate_submission(&self, contents: &[u8]) -> bool;
}

/// Scores one uploaded row.
///
/// Rows are column name to cell value maps, in upload order.
pub trait RowScorer: Send + Sync {
    fn score_row(&self, row: &BTreeMap<String, String>) -> Result<RowScores, EvaluationError>;
}

/// Scores result sidecars by their `total_score` field.
#[derive(Debug, Clone, Default)]
pub struct TotalScoreEvaluator;

impl TotalScoreEvaluator {
    pub const NAME: &'static str = "total_score";
    pub const METRIC: &'static str = "score";

    pub fn new() -> Self {
        Self
    }

    fn descriptor() -> MetricDescriptor {
        MetricDescriptor::new(Self::METRIC, true)
    }

    fn score_document(&self, contents: &[u8]) -> Result<Option<MetricSet>, EvaluationError> {
        let document: Value = serde_json::from_slice(contents)?;
        let fields = match document {
            Value::Null => return Ok(None),
            Value::Object(fields) => fields,
            other => {
                return Err(EvaluationError::Malformed(format!(
                    "expected an object, found {other}"
                )))
            }
        };

        let total = match fields.get("total_score") {
            None | Some(Value::Null) => 0.0,
            Some(value) => value.as_f64().ok_or_else(|| {
                EvaluationError::Malformed(format!("total_score is not a number: {value}"))
            })?,
        };

        Ok(Some(MetricSet::single(Self::descriptor().with_value(total))))
    }
}

impl Evaluator for TotalScoreEvaluator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn metrics(&self) -> Vec<MetricDescriptor> {
        vec![Self::descriptor()]
    }

    fn evaluate(&self, path: &Path) -> Result<Option<MetricSet>, EvaluationError> {
        let is_sidecar = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == SIDECAR_EXTENSION);
        if !is_sidecar {
            return Ok(None);
        }

        let contents = fs::read(path)?;
        self.score_document(&contents)
    }

    fn validate_submission(&self, contents: &[u8]) -> bool {
        self.score_document(contents).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_scores_total_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.json", r#"{"scores": [], "total_score": 12.5}"#);

        let result = TotalScoreEvaluator::new().evaluate(&path).unwrap().unwrap();
        assert_eq!(result.primary_value(), Some(12.5));
        assert_eq!(result.primary().unwrap().name(), "score");
    }

    #[test]
    fn test_missing_total_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.json", r#"{"average_score": {}}"#);

        let result = TotalScoreEvaluator::new().evaluate(&path).unwrap().unwrap();
        assert_eq!(result.primary_value(), Some(0.0));
    }

    #[test]
    fn test_null_sidecar_has_no_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.json", "null\n");

        assert!(TotalScoreEvaluator::new().evaluate(&path).unwrap().is_none());
    }

    #[test]
    fn test_other_extensions_are_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.csv", "total_score\n1\n");

        assert!(TotalScoreEvaluator::new().evaluate(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.json", "{not json");

        let err = TotalScoreEvaluator::new().evaluate(&path).unwrap_err();
        assert!(matches!(err, EvaluationError::Malformed(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TotalScoreEvaluator::new()
            .evaluate(&dir.path().join("gone.json"))
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Io(_)));
    }

    #[test]
    fn test_validate_submission() {
        let evaluator = TotalScoreEvaluator::new();
        assert!(evaluator.validate_submission(br#"{"total_score": 3.0}"#));
        assert!(evaluator.validate_submission(b"null"));
        assert!(!evaluator.validate_submission(b"[1, 2]"));
        assert!(!evaluator.validate_submission(br#"{"total_score": "high"}"#));
        assert!(!evaluator.validate_submission(b"\xff\xfe"));
    }

    #[test]
    fn test_metrics_descriptor() {
        let metrics = TotalScoreEvaluator::new().metrics();
        assert_eq!(metrics, vec![MetricDescriptor::new("score", true)]);
    }
}
