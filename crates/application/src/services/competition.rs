//! Competition façade: submission pipeline, leaderboard and progress views.

use super::{build_leaderboard, build_progress, LeaderboardEntry, ProgressSeries, SessionContext};
use crate::scoring::{evaluator_from_name, parse_upload, render_results_csv, ColumnRowScorer};
use crate::scoring::{ScoringProgress, ScoringRun};
use crate::{ApplicationError, ApplicationResult};
use leaderboard_common::{normalize_extension, validate_submission_name, CompetitionConfig};
use leaderboard_domain::{
    Evaluator, ParticipantError, ParticipantName, RowScorer, SidecarResult, SubmissionError,
};
use leaderboard_infrastructure::SubmissionManager;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A raw upload as received from the participant.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionUpload<'a> {
    pub contents: &'a [u8],
    /// Optional display name
    pub name: Option<&'a str>,
    /// Extension of the uploaded file, if known
    pub extension: Option<&'a str>,
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub participant: String,
    pub submission_name: String,
    pub result: SidecarResult,
    /// Per-row scores as CSV
    pub results_csv: String,
}

pub struct Competition {
    manager: Mutex<SubmissionManager>,
    evaluator: Arc<dyn Evaluator>,
    row_scorer: Arc<dyn RowScorer>,
    config: CompetitionConfig,
    allowed_extension: Option<String>,
}

impl Competition {
    pub fn new(
        config: CompetitionConfig,
        evaluator: Arc<dyn Evaluator>,
        row_scorer: Arc<dyn RowScorer>,
    ) -> ApplicationResult<Self> {
        let allowed_extension = config
            .allowed_extension
            .as_deref()
            .map(normalize_extension)
            .transpose()
            .map_err(ApplicationError::InvalidInput)?;
        let manager = SubmissionManager::new(&config.submissions_dir)?;

        info!(
            root = %config.submissions_dir.display(),
            evaluator = evaluator.name(),
            "competition opened"
        );

        Ok(Self {
            manager: Mutex::new(manager),
            evaluator,
            row_scorer,
            config,
            allowed_extension,
        })
    }

    /// Wire the evaluator and row scorer named in the configuration.
    pub fn from_config(config: CompetitionConfig) -> ApplicationResult<Self> {
        let evaluator = evaluator_from_name(&config.evaluator)?;
        let row_scorer = Arc::new(ColumnRowScorer::new(config.metric_keys.clone()));
        Self::new(config, evaluator, row_scorer)
    }

    pub fn config(&self) -> &CompetitionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// Score and store one upload for the calling participant.
    ///
    /// `on_progress` is called once per scored row. Nothing is written
    /// unless every row scores and the evaluator accepts the result.
    #[instrument(skip_all, fields(session = %ctx.session_id))]
    pub fn submit<F>(
        &self,
        ctx: &SessionContext,
        upload: SubmissionUpload<'_>,
        mut on_progress: F,
    ) -> ApplicationResult<SubmissionReceipt>
    where
        F: FnMut(&ScoringProgress),
    {
        let username = ctx.require_authenticated()?;
        if ctx.is_admin {
            return Err(ApplicationError::Forbidden(
                "The admin account cannot submit".to_string(),
            ));
        }

        self.check_extension(upload.extension)?;
        let submission_name = validate_submission_name(upload.name)
            .map_err(ApplicationError::ValidationFailed)?;
        let username = ParticipantName::parse(username)?.into_inner();

        self.check_participant_limit(&mut self.manager.lock(), &username)?;

        let rows = parse_upload(upload.contents)?;
        let mut run = ScoringRun::new(rows, self.row_scorer.as_ref(), &self.config.metric_keys);
        for step in run.by_ref() {
            on_progress(&step?);
        }
        let result = run.finish()?;

        let sidecar = SidecarResult::to_sidecar_json(Some(&result))
            .map_err(|err| ApplicationError::Internal(err.to_string()))?;
        if !self.evaluator.validate_submission(sidecar.as_bytes()) {
            warn!(participant = %username, "submission rejected by evaluator");
            return Err(ApplicationError::ValidationFailed(
                "Submission failed validation".to_string(),
            ));
        }

        {
            let mut manager = self.manager.lock();
            self.check_participant_limit(&mut manager, &username)?;
            let participant = manager.add_participant(&username, true)?;
            participant.add_submission(
                Cursor::new(upload.contents),
                submission_name.as_deref(),
                self.allowed_extension.as_deref(),
                Some(&result),
            )?;
        }

        let results_csv = render_results_csv(&result)?;
        info!(
            participant = %username,
            rows = result.scores.len(),
            total_score = result.total_score,
            "submission accepted"
        );

        Ok(SubmissionReceipt {
            participant: username,
            submission_name: submission_name.unwrap_or_default(),
            result,
            results_csv,
        })
    }

    /// Ranked leaderboard; everyone but the admin sees the top-K rows.
    #[instrument(skip_all, fields(session = %ctx.session_id))]
    pub fn leaderboard(&self, ctx: &SessionContext) -> ApplicationResult<Vec<LeaderboardEntry>> {
        let top_k = if ctx.is_admin {
            None
        } else {
            Some(self.config.top_k)
        };
        let mut manager = self.manager.lock();
        build_leaderboard(&mut manager, self.evaluator.as_ref(), top_k)
    }

    /// Progress series of one participant, visible to that participant and the admin.
    #[instrument(skip_all, fields(session = %ctx.session_id, participant = participant))]
    pub fn progress(
        &self,
        ctx: &SessionContext,
        participant: &str,
    ) -> ApplicationResult<ProgressSeries> {
        let username = ctx.require_authenticated()?;
        if !ctx.is_admin && username != participant {
            return Err(ApplicationError::Forbidden(
                "Progress is only visible to its owner".to_string(),
            ));
        }
        if participant == self.config.admin_username {
            return Err(ParticipantError::NotFound(participant.to_string()).into());
        }

        let mut manager = self.manager.lock();
        // prune deleted directories first
        manager.participants();
        let submissions = manager
            .get_participant_mut(participant)
            .ok_or_else(|| ParticipantError::NotFound(participant.to_string()))?;
        build_progress(submissions, self.evaluator.as_ref())
    }

    /// Registered participant names, admin only.
    pub fn participants(&self, ctx: &SessionContext) -> ApplicationResult<Vec<String>> {
        ctx.require_admin()?;
        let mut manager = self.manager.lock();
        Ok(manager
            .participants()
            .keys()
            .filter(|name| **name != self.config.admin_username)
            .cloned()
            .collect())
    }

    /// Rescan the submissions directory and drop every cached result.
    #[instrument(skip_all, fields(session = %ctx.session_id))]
    pub fn reload(&self, ctx: &SessionContext) -> ApplicationResult<usize> {
        ctx.require_admin()?;
        let mut manager = self.manager.lock();
        manager.reload_participants()?;
        let mut count = 0;
        for participant in manager.participants_mut() {
            participant.clear_results();
            count += 1;
        }
        info!(participants = count, "submissions reloaded");
        Ok(count)
    }

    fn check_extension(&self, extension: Option<&str>) -> ApplicationResult<()> {
        let Some(allowed) = self.allowed_extension.as_deref() else {
            return Ok(());
        };
        let found = extension
            .map(normalize_extension)
            .transpose()
            .map_err(ApplicationError::ValidationFailed)?;
        match found {
            Some(found) if found == allowed => Ok(()),
            Some(found) => Err(SubmissionError::ExtensionNotAllowed {
                expected: allowed.to_string(),
                found,
            }
            .into()),
            None => Ok(()),
        }
    }

    fn check_participant_limit(
        &self,
        manager: &mut SubmissionManager,
        username: &str,
    ) -> ApplicationResult<()> {
        let Some(max) = self.config.max_users else {
            return Ok(());
        };
        let registered = manager.participants().len();
        if !manager.participant_exists(username) && registered >= max {
            return Err(ParticipantError::LimitReached { max }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_domain::{SessionId, TotalScoreEvaluator};
    use leaderboard_testing::{FixedRowScorer, TestSubmissionsDir};

    fn competition(dir: &TestSubmissionsDir) -> Competition {
        let config = CompetitionConfig {
            submissions_dir: dir.path().to_path_buf(),
            metric_keys: vec!["score".to_string()],
            ..Default::default()
        };
        let scorer = FixedRowScorer::new(leaderboard_testing::row_scores(&[("score", 1.0)]));
        Competition::new(config, Arc::new(TotalScoreEvaluator::new()), Arc::new(scorer)).unwrap()
    }

    fn user(name: &str) -> SessionContext {
        SessionContext::authenticated(SessionId::new(), name.to_string(), "admin")
    }

    #[test]
    fn test_extension_mismatch_rejected() {
        let dir = TestSubmissionsDir::new();
        let competition = competition(&dir);
        let upload = SubmissionUpload {
            contents: b"score\n1\n",
            name: None,
            extension: Some("txt"),
        };
        let err = competition.submit(&user("alice"), upload, |_| {}).unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationFailed(_)));
        assert!(err.to_string().contains("expected \"csv\""));
        assert!(competition.leaderboard(&user("alice")).unwrap().is_empty());
    }

    #[test]
    fn test_extension_matches_case_insensitively() {
        let dir = TestSubmissionsDir::new();
        let competition = competition(&dir);
        let upload = SubmissionUpload {
            contents: b"score\n1\n",
            name: Some("first"),
            extension: Some(".CSV"),
        };
        let receipt = competition.submit(&user("alice"), upload, |_| {}).unwrap();
        assert_eq!(receipt.submission_name, "first");
    }

    #[test]
    fn test_anonymous_cannot_submit() {
        let dir = TestSubmissionsDir::new();
        let competition = competition(&dir);
        let upload = SubmissionUpload {
            contents: b"score\n1\n",
            name: None,
            extension: None,
        };
        let anonymous = SessionContext::anonymous(SessionId::new());
        let err = competition.submit(&anonymous, upload, |_| {}).unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));
    }

    #[test]
    fn test_long_name_rejected() {
        let dir = TestSubmissionsDir::new();
        let competition = competition(&dir);
        let name = "x".repeat(31);
        let upload = SubmissionUpload {
            contents: b"score\n1\n",
            name: Some(&name),
            extension: None,
        };
        let err = competition.submit(&user("alice"), upload, |_| {}).unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationFailed(_)));
    }
}
