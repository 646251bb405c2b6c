use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// What happens to the held token when the renewal endpoint rejects us.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedRefreshPolicy {
    /// Drop the token from memory and from the persistent slot.
    #[default]
    Clear,
    /// Leave the stale token in place.
    Keep,
}

impl FailedRefreshPolicy {
    pub fn clears_token(self) -> bool {
        matches!(self, FailedRefreshPolicy::Clear)
    }
}

impl FromStr for FailedRefreshPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clear" => Ok(FailedRefreshPolicy::Clear),
            "keep" => Ok(FailedRefreshPolicy::Keep),
            other => Err(Error::Config(format!(
                "Unknown refresh failure policy '{}'; expected 'clear' or 'keep'",
                other
            ))),
        }
    }
}
