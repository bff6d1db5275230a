//! Application Services
//!
//! The [`Competition`] façade runs every use case on behalf of a
//! [`SessionContext`].

mod competition;
mod leaderboard;
mod progress;

pub use competition::*;
pub use leaderboard::*;
pub use progress::*;

use crate::ApplicationError;
use leaderboard_domain::{LoginProvider, SessionId};

/// Per-request view of who is calling.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: SessionId,
    /// The authenticated participant (if any)
    pub username: Option<String>,
    /// Whether the user is the competition admin
    pub is_admin: bool,
}

impl SessionContext {
    pub fn anonymous(session_id: SessionId) -> Self {
        Self {
            session_id,
            username: None,
            is_admin: false,
        }
    }

    /// An authenticated session; admin rights follow from the username.
    pub fn authenticated(session_id: SessionId, username: String, admin_username: &str) -> Self {
        Self {
            session_id,
            is_admin: username == admin_username,
            username: Some(username),
        }
    }

    /// Build the session from what the login provider reports.
    ///
    /// Signed-out or disallowed callers are anonymous.
    pub fn from_login(
        session_id: SessionId,
        login: &dyn LoginProvider,
        admin_username: &str,
    ) -> Self {
        if !login.is_access_allowed() || login.has_signed_out() {
            return Self::anonymous(session_id);
        }
        match login.get_username() {
            Some(username) if !username.is_empty() => {
                Self::authenticated(session_id, username, admin_username)
            }
            _ => Self::anonymous(session_id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }

    pub fn require_authenticated(&self) -> Result<&str, ApplicationError> {
        self.username
            .as_deref()
            .ok_or_else(|| ApplicationError::Unauthorized("Authentication required".to_string()))
    }

    pub fn require_admin(&self) -> Result<(), ApplicationError> {
        self.require_authenticated()?;
        if !self.is_admin {
            return Err(ApplicationError::Forbidden(
                "Admin privileges required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaderboard_testing::StaticLogin;

    #[test]
    fn test_from_login_signed_in() {
        let ctx = SessionContext::from_login(SessionId::new(), &StaticLogin::signed_in("alice"), "admin");
        assert_eq!(ctx.username.as_deref(), Some("alice"));
        assert!(!ctx.is_admin);
        assert!(ctx.require_authenticated().is_ok());
        assert!(matches!(ctx.require_admin(), Err(ApplicationError::Forbidden(_))));
    }

    #[test]
    fn test_from_login_admin() {
        let ctx = SessionContext::from_login(SessionId::new(), &StaticLogin::signed_in("admin"), "admin");
        assert!(ctx.is_admin);
        assert!(ctx.require_admin().is_ok());
    }

    #[test]
    fn test_signed_out_is_anonymous() {
        let ctx = SessionContext::from_login(SessionId::new(), &StaticLogin::signed_out("alice"), "admin");
        assert!(ctx.is_anonymous());
        assert!(matches!(ctx.require_authenticated(), Err(ApplicationError::Unauthorized(_))));
    }

    #[test]
    fn test_disallowed_is_anonymous() {
        let login = StaticLogin {
            username: Some("alice".to_string()),
            access_allowed: false,
            signed_out: false,
        };
        assert!(SessionContext::from_login(SessionId::new(), &login, "admin").is_anonymous());
        assert!(SessionContext::from_login(SessionId::new(), &StaticLogin::anonymous(), "admin").is_anonymous());
    }
}
