use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Serializable form of the bearer token as kept in a persistent slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub value: String,
    pub stored_at: Timestamp,
}

impl TokenSnapshot {
    pub fn now(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            stored_at: Timestamp::now(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let snapshot: TokenSnapshot = serde_json::from_str(raw)?;
        if snapshot.value.is_empty() {
            return Err(Error::Slot("Stored token is empty".into()));
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}
