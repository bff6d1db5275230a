//! Submission file naming and result sidecar types.
//!
//! Every submission is stored as `{base64url(name)}_{timestamp}{.ext}` next to a
//! `{base64url(name)}_{timestamp}.json` sidecar. The timestamp encodes creation
//! order and is the sort key for submission time.

use crate::errors::SubmissionError;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Timestamp layout embedded in submission file names.
pub const SUBMISSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%6f";

/// Extension of the result sidecar. Only files with this extension are scored.
pub const SIDECAR_EXTENSION: &str = "json";

/// URL-safe alphabet, padded on encode, padding optional on decode.
const NAME_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The name and timestamp parts of a submission file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFileName {
    pub submission_name: String,
    pub submitted_at: NaiveDateTime,
}

impl SubmissionFileName {
    pub fn new(submission_name: impl Into<String>, submitted_at: NaiveDateTime) -> Self {
        Self {
            submission_name: submission_name.into(),
            submitted_at,
        }
    }

    /// File stem shared by the raw artifact and its sidecar.
    pub fn stem(&self) -> String {
        format!(
            "{}_{}",
            NAME_ENGINE.encode(self.submission_name.as_bytes()),
            self.submitted_at.format(SUBMISSION_TIMESTAMP_FORMAT)
        )
    }

    /// File name with an optional extension (given without the leading dot).
    pub fn file_name(&self, extension: Option<&str>) -> String {
        match extension.filter(|ext| !ext.is_empty()) {
            Some(ext) => format!("{}.{}", self.stem(), ext),
            None => self.stem(),
        }
    }

    pub fn sidecar_file_name(&self) -> String {
        self.file_name(Some(SIDECAR_EXTENSION))
    }

    /// Parse a submission path back into its name and timestamp.
    pub fn parse(path: &Path) -> Result<Self, SubmissionError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SubmissionError::MalformedFileName(path.display().to_string()))?;
        Self::parse_file_name(file_name)
    }

    pub fn parse_file_name(file_name: &str) -> Result<Self, SubmissionError> {
        let malformed = || SubmissionError::MalformedFileName(file_name.to_string());

        // The URL-safe alphabet contains '_', so split on the last one only.
        let (encoded, rest) = file_name.rsplit_once('_').ok_or_else(malformed)?;
        let timestamp = rest.split('.').next().unwrap_or(rest);

        let decoded = NAME_ENGINE.decode(encoded).map_err(|_| malformed())?;
        let submission_name = String::from_utf8(decoded).map_err(|_| malformed())?;
        let submitted_at = NaiveDateTime::parse_from_str(timestamp, SUBMISSION_TIMESTAMP_FORMAT)
            .map_err(|_| malformed())?;

        Ok(Self {
            submission_name,
            submitted_at,
        })
    }
}

/// Decode the submission name embedded in a submission path.
pub fn get_submission_name_from_path(path: &Path) -> Result<String, SubmissionError> {
    SubmissionFileName::parse(path).map(|parsed| parsed.submission_name)
}

/// Decode the submission time embedded in a submission path.
pub fn get_datetime_from_path(path: &Path) -> Result<NaiveDateTime, SubmissionError> {
    SubmissionFileName::parse(path).map(|parsed| parsed.submitted_at)
}

/// Per-metric scores of one scored row.
pub type RowScores = BTreeMap<String, f64>;

/// Precomputed result persisted in the JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidecarResult {
    /// Scores of every uploaded row, in upload order
    pub scores: Vec<RowScores>,
    /// Mean of each metric across rows, rounded to three decimals
    pub average_score: BTreeMap<String, f64>,
    /// Sum of the averages
    pub total_score: f64,
}

impl SidecarResult {
    /// Build the result from per-row scores, averaging the given metric keys.
    ///
    /// Keys outside `metric_keys` are kept in the row scores but do not count
    /// towards the averages.
    pub fn from_rows(scores: Vec<RowScores>, metric_keys: &[String]) -> Self {
        let total_rows = scores.len();
        let mut sums: BTreeMap<String, f64> =
            metric_keys.iter().map(|key| (key.clone(), 0.0)).collect();

        for row in &scores {
            for (key, value) in row {
                if let Some(sum) = sums.get_mut(key) {
                    *sum += value;
                }
            }
        }

        let average_score: BTreeMap<String, f64> = if total_rows == 0 {
            sums
        } else {
            sums.into_iter()
                .map(|(key, sum)| (key, round3(sum / total_rows as f64)))
                .collect()
        };
        let total_score = average_score.values().sum();

        Self {
            scores,
            average_score,
            total_score,
        }
    }

    /// Serialize as the sidecar document body.
    pub fn to_sidecar_json(result: Option<&SidecarResult>) -> serde_json::Result<String> {
        let mut body = serde_json::to_string_pretty(&result)?;
        body.push('\n');
        Ok(body)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
