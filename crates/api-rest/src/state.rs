//! Application state shared by all route handlers.

use crate::extractors::auth::TOKEN_LEEWAY_SECS;
use chrono::Utc;
use leaderboard_application::{ApplicationResult, Competition};
use leaderboard_common::AppConfig;
use leaderboard_domain::SessionId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// The competition all requests operate on
    pub competition: Arc<Competition>,

    /// Sessions whose owners signed out, with their token expiry
    signed_out: Arc<RwLock<HashMap<SessionId, usize>>>,
}

impl AppState {
    /// Open the competition described by the configuration
    pub fn new(config: AppConfig) -> ApplicationResult<Self> {
        let competition = Competition::from_config(config.competition.clone())?;
        Ok(Self::with_competition(config, competition))
    }

    /// Create application state around an already wired competition
    pub fn with_competition(config: AppConfig, competition: Competition) -> Self {
        Self {
            config: Arc::new(config),
            competition: Arc::new(competition),
            signed_out: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }

    /// Name of the admin account
    pub fn admin_username(&self) -> &str {
        &self.config.competition.admin_username
    }

    /// Record that the owner of `session_id` signed out.
    ///
    /// `expires_at` is the token's `exp`. Entries whose tokens can no longer
    /// verify are dropped here.
    pub fn sign_out(&self, session_id: SessionId, expires_at: usize) -> bool {
        let now = Utc::now().timestamp().max(0) as usize;
        let leeway = TOKEN_LEEWAY_SECS as usize;
        let mut signed_out = self.signed_out.write();
        signed_out.retain(|_, exp| exp.saturating_add(leeway) >= now);
        signed_out.insert(session_id, expires_at).is_none()
    }

    pub fn has_signed_out(&self, session_id: &SessionId) -> bool {
        self.signed_out.read().contains_key(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_testing::TestSubmissionsDir;

    fn state(dir: &TestSubmissionsDir) -> AppState {
        let mut config = AppConfig::development();
        config.competition.submissions_dir = dir.path().to_path_buf();
        AppState::new(config).unwrap()
    }

    fn now() -> usize {
        Utc::now().timestamp() as usize
    }

    #[test]
    fn test_sign_out_is_recorded_once() {
        let dir = TestSubmissionsDir::new();
        let state = state(&dir);
        let session_id = SessionId::new();
        assert!(!state.has_signed_out(&session_id));
        assert!(state.sign_out(session_id, now() + 600));
        assert!(!state.sign_out(session_id, now() + 600));
        assert!(state.has_signed_out(&session_id));
    }

    #[test]
    fn test_expired_sessions_are_pruned() {
        let dir = TestSubmissionsDir::new();
        let state = state(&dir);
        let expired = SessionId::new();
        let live = SessionId::new();
        state.sign_out(expired, now() - TOKEN_LEEWAY_SECS as usize - 10);
        state.sign_out(live, now() + 600);

        assert!(!state.has_signed_out(&expired));
        assert!(state.has_signed_out(&live));
        assert_eq!(state.signed_out.read().len(), 1);
    }
}
