use leaderboard_domain::{EvaluationError, RowScorer, RowScores};
use std::collections::BTreeMap;

/// Reads precomputed metric columns from each row.
///
/// Missing or blank cells score 0; anything else must parse as a finite number.
#[derive(Debug, Clone)]
pub struct ColumnRowScorer {
    metric_keys: Vec<String>,
}

impl ColumnRowScorer {
    pub fn new(metric_keys: Vec<String>) -> Self {
        Self { metric_keys }
    }

    pub fn metric_keys(&self) -> &[String] {
        &self.metric_keys
    }
}

impl RowScorer for ColumnRowScorer {
    fn score_row(&self, row: &BTreeMap<String, String>) -> Result<RowScores, EvaluationError> {
        let mut scores = RowScores::new();
        for key in &self.metric_keys {
            let value = match row.get(key).map(|cell| cell.trim()) {
                None | Some("") => 0.0,
                Some(cell) => cell
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| {
                        EvaluationError::Malformed(format!(
                            "column {key} is not a number: {cell:?}"
                        ))
                    })?,
            };
            scores.insert(key.clone(), value);
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reads_configured_columns() {
        let scorer = ColumnRowScorer::new(vec!["gpt_fluency".into(), "gpt_relevance".into()]);
        let scores = scorer
            .score_row(&row(&[("gpt_fluency", " 4.5 "), ("gpt_relevance", "3"), ("extra", "x")]))
            .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["gpt_fluency"], 4.5);
        assert_eq!(scores["gpt_relevance"], 3.0);
    }

    #[test]
    fn test_missing_and_blank_are_zero() {
        let scorer = ColumnRowScorer::new(vec!["a".into(), "b".into()]);
        let scores = scorer.score_row(&row(&[("a", "")])).unwrap();
        assert_eq!(scores["a"], 0.0);
        assert_eq!(scores["b"], 0.0);
    }

    #[test]
    fn test_non_numeric_is_an_error() {
        let scorer = ColumnRowScorer::new(vec!["a".into()]);
        let err = scorer.score_row(&row(&[("a", "great")])).unwrap_err();
        assert!(err.to_string().contains("column a"));
    }

    #[test]
    fn test_non_finite_is_an_error() {
        let scorer = ColumnRowScorer::new(vec!["a".into()]);
        for cell in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let err = scorer.score_row(&row(&[("a", cell)])).unwrap_err();
            assert!(err.to_string().contains("column a"), "accepted {cell}");
        }
    }
}
