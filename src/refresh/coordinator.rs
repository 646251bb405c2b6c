use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use tokio::sync::Mutex;

use crate::errors::Error;
use crate::telemetry::refresh::RefreshTelemetry;

/// Settled result of one call to the renewal endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was stored.
    Renewed,
    /// The endpoint answered 401 or without a usable token.
    Rejected,
}

/// Serialises refreshes so concurrent 401s share one renewal round trip.
///
/// Callers read [`RefreshCoordinator::generation`] before sending their
/// request. If the generation has moved by the time they reach
/// [`RefreshCoordinator::refresh_after`], somebody else already refreshed on
/// their behalf and the settled outcome is handed back without another call.
pub struct RefreshCoordinator {
    generation: AtomicU64,
    settled: Mutex<Option<RefreshOutcome>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            settled: Mutex::new(None),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn refresh_after<F, Fut>(
        &self,
        observed: u64,
        refresh_cb: F,
        telemetry: &RefreshTelemetry,
    ) -> Result<RefreshOutcome, Error>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<RefreshOutcome, Error>>,
    {
        // Held across the renewal call: at most one refresh in flight.
        let mut settled = self.settled.lock().await;
        if self.generation() != observed
            && let Some(outcome) = *settled
        {
            telemetry.emit_shared(outcome);
            return Ok(outcome);
        }

        telemetry.emit_start(SystemTime::now());
        match refresh_cb().await {
            Ok(outcome) => {
                *settled = Some(outcome);
                self.generation.fetch_add(1, Ordering::SeqCst);
                match outcome {
                    RefreshOutcome::Renewed => telemetry.emit_success(SystemTime::now()),
                    RefreshOutcome::Rejected => telemetry.emit_rejected(SystemTime::now()),
                }
                Ok(outcome)
            }
            Err(err) => {
                // Not recorded: the next waiter gets to try for itself.
                telemetry.emit_failure(&err, SystemTime::now());
                Err(err)
            }
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
