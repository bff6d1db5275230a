use crate::{Error, Result};
use chrono::{NaiveDateTime, Utc};
use leaderboard_domain::submission::{SIDECAR_EXTENSION, SidecarResult, SubmissionFileName};
use leaderboard_domain::{Evaluator, MetricSet, SubmissionError};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// One cached evaluation result with the metadata decoded from its file name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSubmission {
    pub path: PathBuf,
    pub submission_name: String,
    pub submitted_at: NaiveDateTime,
    pub metrics: MetricSet,
}

/// Submissions of a single participant, stored in one directory.
///
/// Evaluation results are cached per path. A cached entry is never
/// recomputed; files the evaluator does not score are remembered separately
/// so they are not evaluated again either.
#[derive(Debug)]
pub struct ParticipantSubmissions {
    name: String,
    dir: PathBuf,
    results: HashMap<PathBuf, MetricSet>,
    unscored: HashSet<PathBuf>,
}

impl ParticipantSubmissions {
    /// Open the participant directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(Error::io(&dir))?;
        let name = dir
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or_else(|| {
                leaderboard_domain::ParticipantError::InvalidName(dir.display().to_string())
            })?;

        Ok(Self {
            name,
            dir,
            results: HashMap::new(),
            unscored: HashSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the directory still exists on disk.
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Cached results keyed by submission path.
    pub fn results(&self) -> &HashMap<PathBuf, MetricSet> {
        &self.results
    }

    /// Submissions eligible for scoring (result sidecars), in submission-time order.
    ///
    /// Files whose names do not follow the submission scheme are skipped.
    pub fn get_submissions(&self) -> Result<Vec<PathBuf>> {
        let mut submissions = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(Error::io(&self.dir))? {
            let entry = entry.map_err(Error::io(&self.dir))?;
            let path = entry.path();
            let is_file = entry.file_type().map_err(Error::io(&path))?.is_file();
            let is_sidecar = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == SIDECAR_EXTENSION);
            if !is_file || !is_sidecar {
                continue;
            }

            match SubmissionFileName::parse(&path) {
                Ok(parsed) => submissions.push((parsed.submitted_at, path)),
                Err(err) => warn!(participant = %self.name, error = %err, "skipping unrecognized file"),
            }
        }

        submissions.sort();
        Ok(submissions.into_iter().map(|(_, path)| path).collect())
    }

    /// Store an uploaded file and its result sidecar.
    ///
    /// Both files share a freshly timestamped stem and are created
    /// exclusively; an existing file is an error and is never overwritten.
    /// Returns the path of the raw file.
    #[instrument(skip(self, stream, result), fields(participant = %self.name))]
    pub fn add_submission<R: Read>(
        &mut self,
        mut stream: R,
        submission_name: Option<&str>,
        extension: Option<&str>,
        result: Option<&SidecarResult>,
    ) -> Result<PathBuf> {
        let extension = extension
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty());
        if let Some(ext) = extension {
            if ext.eq_ignore_ascii_case(SIDECAR_EXTENSION) {
                return Err(SubmissionError::ReservedExtension(ext.to_string()).into());
            }
        }

        fs::create_dir_all(&self.dir).map_err(Error::io(&self.dir))?;

        let file_name = SubmissionFileName::new(
            submission_name.unwrap_or_default(),
            Utc::now().naive_utc(),
        );
        let raw_path = self.dir.join(file_name.file_name(extension));
        let sidecar_path = self.dir.join(file_name.sidecar_file_name());

        let mut raw = create_new(&raw_path)?;
        io::copy(&mut stream, &mut raw).map_err(Error::io(&raw_path))?;
        raw.flush().map_err(Error::io(&raw_path))?;

        let body = SidecarResult::to_sidecar_json(result)?;
        let mut sidecar = create_new(&sidecar_path)?;
        sidecar
            .write_all(body.as_bytes())
            .map_err(Error::io(&sidecar_path))?;

        debug!(path = %raw_path.display(), scored = result.is_some(), "submission stored");
        Ok(raw_path)
    }

    /// Evaluate every submission that is not cached yet.
    ///
    /// Returns the number of files evaluated by this call.
    #[instrument(skip(self, evaluator), fields(participant = %self.name, evaluator = evaluator.name()))]
    pub fn update_results(&mut self, evaluator: &dyn Evaluator) -> Result<usize> {
        let mut evaluated = 0;
        for path in self.get_submissions()? {
            if self.results.contains_key(&path) || self.unscored.contains(&path) {
                continue;
            }

            let outcome = evaluator.evaluate(&path).map_err(|source| Error::Evaluation {
                path: path.clone(),
                source,
            })?;
            match outcome {
                Some(metrics) => {
                    self.results.insert(path, metrics);
                }
                None => {
                    debug!(path = %path.display(), "submission has no score");
                    self.unscored.insert(path);
                }
            }
            evaluated += 1;
        }

        if evaluated > 0 {
            debug!(evaluated, cached = self.results.len(), "results updated");
        }
        Ok(evaluated)
    }

    /// Best cached result; among equal results the earliest submission wins.
    pub fn get_best_result(&self) -> Option<ScoredSubmission> {
        self.scored_submissions()
            .into_iter()
            .reduce(|best, candidate| {
                if candidate.metrics > best.metrics {
                    candidate
                } else {
                    best
                }
            })
    }

    /// All cached results in submission-time order.
    pub fn scored_submissions(&self) -> Vec<ScoredSubmission> {
        let mut scored: Vec<ScoredSubmission> = self
            .results
            .iter()
            .filter_map(|(path, metrics)| {
                let parsed = SubmissionFileName::parse(path).ok()?;
                Some(ScoredSubmission {
                    path: path.clone(),
                    submission_name: parsed.submission_name,
                    submitted_at: parsed.submitted_at,
                    metrics: metrics.clone(),
                })
            })
            .collect();
        scored.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        scored
    }

    /// Forget every cached result so the next update re-evaluates all files.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.unscored.clear();
    }
}

fn create_new(path: &Path) -> Result<File> {
    File::options()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(Error::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_domain::TotalScoreEvaluator;
    use std::io::Cursor;

    fn sidecar(total: f64) -> SidecarResult {
        SidecarResult {
            scores: Vec::new(),
            average_score: Default::default(),
            total_score: total,
        }
    }

    #[test]
    fn test_open_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let participant = ParticipantSubmissions::open(root.path().join("alice")).unwrap();
        assert!(participant.exists());
        assert_eq!(participant.name(), "alice");

        // Idempotent
        ParticipantSubmissions::open(root.path().join("alice")).unwrap();
    }

    #[test]
    fn test_add_submission_writes_raw_and_sidecar() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("alice")).unwrap();

        let raw = participant
            .add_submission(Cursor::new(b"a,b\n1,2\n"), Some("first"), Some("csv"), Some(&sidecar(2.5)))
            .unwrap();

        assert_eq!(fs::read(&raw).unwrap(), b"a,b\n1,2\n");
        assert_eq!(raw.extension().unwrap(), "csv");

        let submissions = participant.get_submissions().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0], raw.with_extension("json"));

        let stored: Option<SidecarResult> =
            serde_json::from_slice(&fs::read(&submissions[0]).unwrap()).unwrap();
        assert_eq!(stored.unwrap().total_score, 2.5);
    }

    #[test]
    fn test_add_submission_without_result_writes_null() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("bob")).unwrap();

        participant
            .add_submission(Cursor::new(b"x"), None, Some("csv"), None)
            .unwrap();

        let submissions = participant.get_submissions().unwrap();
        assert_eq!(fs::read_to_string(&submissions[0]).unwrap(), "null\n");
    }

    #[test]
    fn test_json_extension_is_reserved() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("bob")).unwrap();

        let err = participant
            .add_submission(Cursor::new(b"{}"), None, Some(".JSON"), None)
            .unwrap_err();
        assert!(matches!(err, Error::Submission(SubmissionError::ReservedExtension(_))));
        assert!(participant.get_submissions().unwrap().is_empty());
    }

    #[test]
    fn test_existing_file_is_never_overwritten() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("taken.csv");
        fs::write(&path, "original").unwrap();

        assert!(matches!(create_new(&path), Err(Error::Io { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("carol")).unwrap();
        fs::write(participant.dir().join("notes.json"), "{}").unwrap();
        fs::write(participant.dir().join("readme.txt"), "hi").unwrap();
        fs::create_dir(participant.dir().join("nested.json")).unwrap();

        assert!(participant.get_submissions().unwrap().is_empty());
        assert_eq!(participant.update_results(&TotalScoreEvaluator::new()).unwrap(), 0);
    }

    #[test]
    fn test_best_result() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("dave")).unwrap();
        for total in [0.2, 0.8, 0.5] {
            participant
                .add_submission(Cursor::new(b"x"), None, Some("csv"), Some(&sidecar(total)))
                .unwrap();
        }

        assert_eq!(participant.update_results(&TotalScoreEvaluator::new()).unwrap(), 3);
        let best = participant.get_best_result().unwrap();
        assert_eq!(best.metrics.primary_value(), Some(0.8));
    }

    #[test]
    fn test_best_result_tie_prefers_earliest() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("erin")).unwrap();
        participant
            .add_submission(Cursor::new(b"x"), Some("early"), Some("csv"), Some(&sidecar(0.5)))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        participant
            .add_submission(Cursor::new(b"x"), Some("late"), Some("csv"), Some(&sidecar(0.5)))
            .unwrap();

        participant.update_results(&TotalScoreEvaluator::new()).unwrap();
        assert_eq!(participant.get_best_result().unwrap().submission_name, "early");
    }

    #[test]
    fn test_null_sidecar_is_not_cached() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("frank")).unwrap();
        participant
            .add_submission(Cursor::new(b"x"), None, Some("csv"), None)
            .unwrap();

        assert_eq!(participant.update_results(&TotalScoreEvaluator::new()).unwrap(), 1);
        assert!(participant.results().is_empty());
        assert!(participant.get_best_result().is_none());
        assert_eq!(participant.update_results(&TotalScoreEvaluator::new()).unwrap(), 0);
    }

    #[test]
    fn test_clear_results_forces_reevaluation() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("gina")).unwrap();
        participant
            .add_submission(Cursor::new(b"x"), None, None, Some(&sidecar(1.0)))
            .unwrap();

        let evaluator = TotalScoreEvaluator::new();
        assert_eq!(participant.update_results(&evaluator).unwrap(), 1);
        participant.clear_results();
        assert!(participant.results().is_empty());
        assert_eq!(participant.update_results(&evaluator).unwrap(), 1);
    }

    #[test]
    fn test_malformed_sidecar_propagates() {
        let root = tempfile::tempdir().unwrap();
        let mut participant = ParticipantSubmissions::open(root.path().join("hank")).unwrap();
        let name = SubmissionFileName::new("broken", Utc::now().naive_utc());
        fs::write(participant.dir().join(name.sidecar_file_name()), "{oops").unwrap();

        let err = participant.update_results(&TotalScoreEvaluator::new()).unwrap_err();
        assert!(matches!(err, Error::Evaluation { .. }));
    }
}
