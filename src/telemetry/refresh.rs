use std::time::SystemTime;

use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;
use crate::refresh::RefreshOutcome;

/// Structured events for one caller's trip through the refresh path.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_start(&self, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            outcome = ?RefreshOutcome::Renewed,
            "refresh.success"
        );
    }

    pub fn emit_rejected(&self, at: SystemTime) {
        event!(
            Level::WARN,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            outcome = ?RefreshOutcome::Rejected,
            "refresh.rejected"
        );
    }

    pub fn emit_shared(&self, outcome: RefreshOutcome) {
        event!(
            Level::DEBUG,
            attempt_id = %self.attempt_id,
            context = %self.context,
            outcome = ?outcome,
            "refresh.shared"
        );
    }

    pub fn emit_failure(&self, error: &Error, at: SystemTime) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            error = %error,
            "refresh.failure"
        );
    }
}
