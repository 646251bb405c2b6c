//! read configuration from a file, the environment or a secret

use std::path::Path;

use aws_config::BehaviorVersion;
use serde::Deserialize;

use crate::errors::Error;
use crate::refresh::FailedRefreshPolicy;

pub const DEFAULT_REFRESH_PATH: &str = "v1/auth/refresh";
pub const DEFAULT_LOGIN_PATH: &str = "/login";

pub enum ConfigLocation {
    File(String),
    Env,
    Secret,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default)]
    pub token_slot_path: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_max_refreshes")]
    pub max_refreshes: u8,
    #[serde(default)]
    pub on_refresh_failure: FailedRefreshPolicy,
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_max_refreshes() -> u8 {
    1
}

impl Config {
    /// Build a config from explicit values, falling back to defaults for the
    /// optional knobs.
    pub fn from_values(
        base_url: impl Into<String>,
        refresh_path: Option<String>,
        login_path: Option<String>,
        token_slot_path: Option<String>,
        request_timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: refresh_path.unwrap_or_else(default_refresh_path),
            login_path: login_path.unwrap_or_else(default_login_path),
            token_slot_path,
            request_timeout_secs,
            max_refreshes: default_max_refreshes(),
            on_refresh_failure: FailedRefreshPolicy::default(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn from_env() -> Result<Self, Error> {
        read_config_from_env()
    }

    pub fn with_refresh_policy(mut self, policy: FailedRefreshPolicy) -> Self {
        self.on_refresh_failure = policy;
        self
    }

    pub fn with_max_refreshes(mut self, max_refreshes: u8) -> Self {
        self.max_refreshes = max_refreshes;
        self
    }
}

pub async fn read_config(loc: ConfigLocation) -> Result<Config, Error> {
    let config = match loc {
        ConfigLocation::File(path) => Config::from_file(path)?,
        ConfigLocation::Env => read_config_from_env()?,
        ConfigLocation::Secret => read_config_from_secret().await?,
    };
    Ok(config)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, Error> {
    optional_env(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| Error::Config(format!("Invalid value for {key}: '{raw}'")))
        })
        .transpose()
}

fn read_config_from_env() -> Result<Config, Error> {
    let base_url = std::env::var("API_BASE_URL")
        .map_err(|_| Error::Config("Missing API_BASE_URL env var".to_string()))?;
    let mut config = Config::from_values(
        base_url,
        optional_env("API_REFRESH_PATH"),
        optional_env("API_LOGIN_PATH"),
        optional_env("API_TOKEN_SLOT"),
        parse_env::<u64>("API_REQUEST_TIMEOUT_SECS")?,
    );
    if let Some(max_refreshes) = parse_env::<u8>("API_MAX_REFRESHES")? {
        config.max_refreshes = max_refreshes;
    }
    if let Some(policy) = parse_env::<FailedRefreshPolicy>("API_ON_REFRESH_FAILURE")? {
        config.on_refresh_failure = policy;
    }
    Ok(config)
}

async fn read_config_from_secret() -> Result<Config, Error> {
    let secret_arn = std::env::var("API_SESSION_CONFIG_SECRET_ARN").map_err(|_| {
        Error::Config("Missing API_SESSION_CONFIG_SECRET_ARN env var".to_string())
    })?;
    let client = aws_sdk_secretsmanager::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let resp = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
    let secret = match resp.secret_string() {
        Some(s) => Ok(s),
        None => Err(Error::Config(
            "Failed to get secret string, returned None".to_string(),
        )),
    }?;
    let config: Config = serde_json::from_str(secret)?;
    Ok(config)
}
