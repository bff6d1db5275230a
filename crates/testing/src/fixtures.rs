//! Test fixtures for submissions directories and uploads.

use chrono::{DateTime, NaiveDateTime};
use leaderboard_domain::{RowScores, SidecarResult, SubmissionFileName};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Header of [`SAMPLE_CSV`].
pub const SAMPLE_CSV_COLUMNS: [&str; 7] = [
    "question",
    "answer",
    "gpt_relevance",
    "gpt_groundedness",
    "gpt_similarity",
    "gpt_fluency",
    "ada_cosine_similarity",
];

/// Three scored rows; the column averages are 4.0, 3.0, 3.667, 5.0 and 0.9,
/// so the total is 16.567.
pub const SAMPLE_CSV: &str = "\
question,answer,gpt_relevance,gpt_groundedness,gpt_similarity,gpt_fluency,ada_cosine_similarity
What is Rust?,A systems language,5,3,4,5,0.95
Who maintains it?,The Rust project,4,2,3,5,0.85
\"Is it fast, really?\",Yes,3,4,4,5,0.9
";

/// Expected total score of [`SAMPLE_CSV`].
pub const SAMPLE_CSV_TOTAL: f64 = 16.567;

/// A temporary submissions root, removed on drop.
pub struct TestSubmissionsDir {
    dir: TempDir,
}

impl TestSubmissionsDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp submissions dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory of one participant, created if missing.
    pub fn participant_dir(&self, name: &str) -> PathBuf {
        let dir = self.dir.path().join(name);
        fs::create_dir_all(&dir).expect("create participant dir");
        dir
    }
}

impl Default for TestSubmissionsDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp `secs` seconds after the Unix epoch.
pub fn timestamp(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .expect("timestamp in range")
        .naive_utc()
}

/// A sidecar result with no rows and the given total.
pub fn sidecar_result(total: f64) -> SidecarResult {
    SidecarResult {
        scores: Vec::new(),
        average_score: BTreeMap::new(),
        total_score: total,
    }
}

/// A row of metric scores.
pub fn row_scores(pairs: &[(&str, f64)]) -> RowScores {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

/// Write a sidecar with a fixed timestamp into a participant directory.
///
/// `None` writes a `null` sidecar.
pub fn write_sidecar(
    participant_dir: &Path,
    submission_name: &str,
    submitted_at: NaiveDateTime,
    total: Option<f64>,
) -> PathBuf {
    let name = SubmissionFileName::new(submission_name, submitted_at);
    let path = participant_dir.join(name.sidecar_file_name());
    let result = total.map(sidecar_result);
    let body = SidecarResult::to_sidecar_json(result.as_ref()).expect("serialize sidecar");
    fs::write(&path, body).expect("write sidecar");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sidecar_round_trips_name() {
        let dir = TestSubmissionsDir::new();
        let path = write_sidecar(&dir.participant_dir("alice"), "v1", timestamp(60), Some(1.0));

        let parsed = SubmissionFileName::parse(&path).unwrap();
        assert_eq!(parsed.submission_name, "v1");
        assert_eq!(parsed.submitted_at, timestamp(60));
    }

    #[test]
    fn test_sample_csv_header() {
        let header = SAMPLE_CSV.lines().next().unwrap();
        assert_eq!(header, SAMPLE_CSV_COLUMNS.join(","));
    }
}
