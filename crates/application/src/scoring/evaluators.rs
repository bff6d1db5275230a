use crate::{ApplicationError, ApplicationResult};
use leaderboard_domain::{Evaluator, TotalScoreEvaluator};
use std::sync::Arc;

/// Evaluator variants selectable in configuration.
pub const AVAILABLE_EVALUATORS: [&str; 1] = [TotalScoreEvaluator::NAME];

/// Build the evaluator configured by name.
pub fn evaluator_from_name(name: &str) -> ApplicationResult<Arc<dyn Evaluator>> {
    match name {
        TotalScoreEvaluator::NAME => Ok(Arc::new(TotalScoreEvaluator::new())),
        other => Err(ApplicationError::InvalidInput(format!(
            "Unknown evaluator '{}'. Available: {}",
            other,
            AVAILABLE_EVALUATORS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_evaluator() {
        let evaluator = evaluator_from_name("total_score").unwrap();
        assert_eq!(evaluator.name(), "total_score");
    }

    #[test]
    fn test_unknown_evaluator() {
        let err = evaluator_from_name("f1").err().unwrap();
        assert!(err.to_string().contains("total_score"));
    }
}
