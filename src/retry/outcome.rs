use reqwest::{Method, StatusCode};
use tracing::Level;
use tracing::event;

/// Summary of one logical call through the request engine.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub method: Method,
    pub path: String,
    pub attempts: u8,
    pub refreshes: u8,
    pub status: Option<StatusCode>,
    pub expired: bool,
}

impl RequestOutcome {
    pub fn log(&self) {
        event!(
            Level::INFO,
            method = %self.method,
            path = %self.path,
            attempts = self.attempts,
            refreshes = self.refreshes,
            status = self.status.map(|s| s.as_u16()),
            expired = self.expired,
            "request.outcome"
        );
    }
}
