use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::errors::Error;

use super::TokenSnapshot;

/// Durable home for the bearer token across process restarts.
pub trait TokenSlot: Send + Sync {
    fn load(&self) -> Result<Option<String>, Error>;
    fn save(&self, token: &str) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// Slot that lives as long as the process. Handy for tests and for hosts
/// that manage persistence themselves.
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, Error> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// JSON file holding a [`TokenSnapshot`].
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(TokenSnapshot::from_json(&raw)?.value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, TokenSnapshot::now(token).to_json()?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("api-session-slot-{}", uuid::Uuid::new_v4()));
        path.push("token.json");
        path
    }

    #[test]
    fn memory_slot_round_trip() {
        let slot = MemorySlot::new();
        assert_eq!(slot.load().unwrap(), None);
        slot.save("abc").unwrap();
        assert_eq!(slot.load().unwrap().as_deref(), Some("abc"));
        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
    }

    #[test]
    fn file_slot_persists_snapshot() {
        let path = temp_path();
        let slot = FileSlot::new(&path);
        assert_eq!(slot.path(), path.as_path());
        assert_eq!(slot.load().unwrap(), None);

        slot.save("persisted").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let snapshot = TokenSnapshot::from_json(&raw).unwrap();
        assert_eq!(snapshot.value, "persisted");

        let reopened = FileSlot::new(&path);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("persisted"));

        reopened.clear().unwrap();
        assert!(!path.exists());
        // clearing twice is fine
        reopened.clear().unwrap();
    }

    #[test]
    fn file_slot_rejects_garbage() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        match FileSlot::new(&path).load() {
            Err(Error::Json(_)) => {}
            other => panic!("expected Error::Json, got {:?}", other),
        }
    }
}
