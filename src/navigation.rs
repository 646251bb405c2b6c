//! client-side route changes triggered on terminal token expiry

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Performs a route change to a login entry point.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Default navigator: records the redirect in the log and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "navigation.redirect");
    }
}

/// Forwards redirect targets to a UI loop over a tokio channel.
#[derive(Clone, Debug)]
pub struct ChannelNavigator {
    tx: UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            warn!(path, "navigation.receiver_dropped");
        }
    }
}
