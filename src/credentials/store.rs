use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::TokenSlot;

/// Single source of truth for the bearer token within a session.
///
/// Reads never block on I/O. When a persistent slot is attached every write
/// is mirrored into it; slot failures are logged and otherwise ignored so
/// the in-memory token always reflects the last write.
pub struct CredentialStore {
    token: RwLock<Option<String>>,
    slot: Option<Arc<dyn TokenSlot>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
            slot: None,
        }
    }

    /// Attach a persistent slot and restore whatever token it holds.
    pub fn with_slot(slot: Arc<dyn TokenSlot>) -> Self {
        let restored = match slot.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "credentials.restore_failed");
                None
            }
        };
        debug!(restored = restored.is_some(), "credentials.restored");
        Self {
            token: RwLock::new(restored),
            slot: Some(slot),
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(slot) = &self.slot
            && let Err(err) = slot.save(&token)
        {
            warn!(error = %err, "credentials.persist_failed");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear(&self) {
        if let Some(slot) = &self.slot
            && let Err(err) = slot.clear()
        {
            warn!(error = %err, "credentials.clear_failed");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
