use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Error string returned for every terminal authentication failure.
pub const TOKEN_EXPIRED: &str = "Token expired";

/// Outcome of one API call: `{"result": T}` or `{"error": "..."}`.
///
/// Bodies that carry both fields (`{"result": null, "error": "..."}`) are read
/// as errors; a body with neither is rejected as malformed. A `result` key
/// that is present but `null` is still a result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Result(T),
    Error(String),
}

impl<T> ApiResponse<T> {
    pub fn expired() -> Self {
        ApiResponse::Error(TOKEN_EXPIRED.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error(_))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, ApiResponse::Error(msg) if msg == TOKEN_EXPIRED)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResponse::Error(msg) => Some(msg),
            ApiResponse::Result(_) => None,
        }
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            ApiResponse::Result(value) => Some(value),
            ApiResponse::Error(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ApiResponse::Result(value) => Ok(value),
            ApiResponse::Error(msg) => Err(msg),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Result(value) => ApiResponse::Result(f(value)),
            ApiResponse::Error(msg) => ApiResponse::Error(msg),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default, deserialize_with = "present")]
            result: Option<Value>,
            #[serde(default)]
            error: Option<String>,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        match (envelope.result, envelope.error) {
            (_, Some(error)) => Ok(ApiResponse::Error(error)),
            (Some(result), None) => serde_json::from_value(result)
                .map(ApiResponse::Result)
                .map_err(de::Error::custom),
            (None, None) => Err(de::Error::custom(
                "response carries neither `result` nor `error`",
            )),
        }
    }
}

/// `Some` whenever the key exists, even for `"result": null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Payload of a successful renewal call.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}
