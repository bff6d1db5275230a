use crate::{ApplicationError, ApplicationResult};
use leaderboard_domain::SidecarResult;
use std::collections::BTreeSet;

/// Render the per-row scores of a result as CSV.
///
/// Columns are the union of every row's metrics in name order; a metric a row
/// lacks is left empty.
pub fn render_results_csv(result: &SidecarResult) -> ApplicationResult<String> {
    let columns: BTreeSet<&str> = result
        .scores
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let internal = |err: csv::Error| ApplicationError::Internal(format!("Failed to write results CSV: {err}"));

    let mut writer = csv::Writer::from_writer(Vec::new());
    if !columns.is_empty() {
        writer.write_record(&columns).map_err(internal)?;
    }
    for row in &result.scores {
        let record: Vec<String> = columns
            .iter()
            .map(|column| row.get(*column).map(f64::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&record).map_err(internal)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ApplicationError::Internal(format!("Failed to write results CSV: {err}")))?;
    String::from_utf8(bytes)
        .map_err(|err| ApplicationError::Internal(format!("Results CSV is not UTF-8: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_domain::RowScores;

    #[test]
    fn test_render_results() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let result = SidecarResult::from_rows(
            vec![
                RowScores::from([("a".to_string(), 1.0), ("b".to_string(), 0.5)]),
                RowScores::from([("a".to_string(), 2.0)]),
            ],
            &keys,
        );

        let csv = render_results_csv(&result).unwrap();
        assert_eq!(csv, "a,b\n1,0.5\n2,\n");
    }

    #[test]
    fn test_render_empty_result() {
        let result = SidecarResult::from_rows(Vec::new(), &[]);
        assert_eq!(render_results_csv(&result).unwrap(), "");
    }
}
