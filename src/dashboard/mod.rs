//! Dashboard client
//!
//! Talks to the relay exactly as the browser frontend does: logs in, loads
//! the plant list once, then polls real-time KPIs on a timer and folds them
//! into totals.
//!
//! - `session`: in-memory session token and the logged-in guard
//! - `client`: HTTP client for the relay endpoints
//! - `aggregate`: per-plant telemetry folded into dashboard totals
//! - `poller`: the repeating KPI refresh task
//! - `render`: plain-text rendering of the current state

pub mod aggregate;
pub mod client;
pub mod poller;
pub mod render;
pub mod session;

pub use aggregate::DashboardTotals;
pub use client::RelayClient;
pub use poller::{DashboardState, KpiPoller, PollerHandle};
pub use session::{Session, SessionState};

use thiserror::Error;

use crate::models::FailCode;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay error ({status}): {message}")]
    Relay { status: u16, message: String },

    #[error("Vendor error {code}: {message}")]
    Vendor { code: FailCode, message: String },

    #[error("Login response carried no session token")]
    MissingToken,

    #[error("Malformed relay response: {0}")]
    Malformed(String),
}

impl DashboardError {
    /// Message shown to the user. No corrective action is attached to any of them.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::NotLoggedIn => "Please log in first.".to_string(),
            DashboardError::Transport(_) => {
                "Cannot reach the server. Check your connection.".to_string()
            }
            DashboardError::Relay { message, .. } => format!("Server error: {}", message),
            DashboardError::Vendor { code, message } => match code {
                FailCode::RateLimited => {
                    "Too many requests to FusionSolar. Data will refresh on the next update."
                        .to_string()
                }
                FailCode::ReloginRequired => {
                    "Your FusionSolar session has expired. Please log in again.".to_string()
                }
                FailCode::InvalidStationCodes => {
                    "FusionSolar rejected one or more plant codes for this account.".to_string()
                }
                FailCode::Other(code) if message.is_empty() => {
                    format!("FusionSolar request failed (code {}).", code)
                }
                FailCode::Other(code) => {
                    format!("FusionSolar request failed (code {}): {}", code, message)
                }
            },
            DashboardError::MissingToken => {
                "Login succeeded but no session token was returned.".to_string()
            }
            DashboardError::Malformed(_) => "Unexpected response from the server.".to_string(),
        }
    }
}
