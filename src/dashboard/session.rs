//! In-memory session state

use chrono::{DateTime, Utc};

use super::DashboardError;

/// Vendor session token captured at login. Never persisted.
#[derive(Clone)]
pub struct Session {
    token: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            logged_in_at: Utc::now(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("logged_in_at", &self.logged_in_at)
            .finish()
    }
}

/// Holds at most one session for the lifetime of the dashboard
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    pub fn login(&mut self, session: Session) {
        self.current = Some(session);
    }

    /// Guard for every non-login vendor call
    pub fn require(&self) -> Result<&Session, DashboardError> {
        self.current.as_ref().ok_or(DashboardError::NotLoggedIn)
    }

    /// Discard the token, returning it for a best-effort vendor logout
    pub fn logout(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_before_login() {
        let state = SessionState::default();
        assert!(!state.is_logged_in());
        assert!(matches!(state.require(), Err(DashboardError::NotLoggedIn)));
    }

    #[test]
    fn test_login_then_logout() {
        let mut state = SessionState::default();
        state.login(Session::new("tok"));
        assert_eq!(state.require().unwrap().token(), "tok");

        let dropped = state.logout().unwrap();
        assert_eq!(dropped.token(), "tok");
        assert!(state.require().is_err());
        assert!(state.logout().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("very-secret");
        assert!(!format!("{:?}", session).contains("very-secret"));
    }
}
