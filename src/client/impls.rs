use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    ApiSession,
    config::{Config, ConfigLocation, read_config},
    credentials::{CredentialStore, FileSlot},
    endpoint::BaseUrl,
    errors::Error,
    navigation::{LogNavigator, Navigator},
    refresh::RefreshOutcome,
    request_context::{RequestDescriptor, RequestDispatchContext},
    retry::RequestOutcome,
    telemetry::refresh::RefreshTelemetry,
    types::{AccessToken, ApiResponse},
};

const USER_AGENT: &str = "api-session-rust/0.1.0";

impl ApiSession {
    /// Create a session from explicit configuration.
    ///
    /// When `token_slot_path` is set the token persisted there (if any) is
    /// restored and every later write is mirrored back to it.
    pub fn new(config: Config) -> Result<Self, Error> {
        let store = match config.token_slot_path.as_deref() {
            Some(path) => CredentialStore::with_slot(Arc::new(FileSlot::new(path))),
            None => CredentialStore::new(),
        };
        Self::with_store(config, Arc::new(store))
    }

    /// Create a session around a caller-supplied credential store.
    pub fn with_store(config: Config, store: Arc<CredentialStore>) -> Result<Self, Error> {
        let base = BaseUrl::parse(&config.base_url)?;
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;
        info!(
            "api session ready: base='{}' refresh='{}' restored_token={}",
            base.as_str(),
            config.refresh_path,
            store.has_token()
        );
        Ok(ApiSession {
            base,
            refresh_path: config.refresh_path,
            login_path: config.login_path,
            max_refreshes: config.max_refreshes,
            on_refresh_failure: config.on_refresh_failure,
            context: RequestDispatchContext::build(http_client, store),
            navigator: Arc::new(LogNavigator),
        })
    }

    pub async fn from_location(location: ConfigLocation) -> Result<Self, Error> {
        Self::new(read_config(location).await?)
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    pub fn credentials(&self) -> Arc<CredentialStore> {
        self.context.store()
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        self.context.store().set_token(token);
        info!("session signed in");
    }

    pub fn sign_out(&self) {
        self.context.store().clear();
        info!("session signed out");
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, Error> {
        self.request(&RequestDescriptor::new(Method::GET, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(&RequestDescriptor::new(Method::POST, path).with_body(body)?).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(&RequestDescriptor::new(Method::PUT, path).with_body(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, Error> {
        self.request(&RequestDescriptor::new(Method::DELETE, path)).await
    }

    /// Issue one logical call.
    ///
    /// Any status but 401 is handed back as the decoded body, untouched. A
    /// 401 triggers a renewal (shared with concurrent callers) and a retry,
    /// up to `max_refreshes` times. When renewal is refused, or the budget is
    /// spent, the result is `Token expired` and, unless the descriptor
    /// suppresses it, the navigator is sent to the login path.
    ///
    /// Transport and decoding failures are returned as `Err`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ApiResponse<T>, Error> {
        let refresh = self.context.refresh();
        let mut outcome = RequestOutcome {
            method: descriptor.method().clone(),
            path: descriptor.path().to_string(),
            attempts: 0,
            refreshes: 0,
            status: None,
            expired: false,
        };

        loop {
            // generation must be read before the token
            let generation = refresh.generation();
            let token = self.context.store().get_token();
            outcome.attempts = outcome.attempts.saturating_add(1);

            let response = self.send(descriptor, token.as_deref()).await?;
            let status = response.status();
            outcome.status = Some(status);

            if status != StatusCode::UNAUTHORIZED {
                let body = response.bytes().await?;
                outcome.log();
                return Ok(serde_json::from_slice(&body)?);
            }

            warn!(
                method = %descriptor.method(),
                path = descriptor.path(),
                attempt = outcome.attempts,
                "request unauthorized: status=401"
            );
            if outcome.refreshes >= self.max_refreshes {
                return Ok(self.expire(descriptor, outcome));
            }
            outcome.refreshes += 1;

            let telemetry = RefreshTelemetry::new(format!(
                "{} {}",
                descriptor.method(),
                descriptor.path()
            ));
            match refresh
                .refresh_after(generation, || self.renew_token(), &telemetry)
                .await?
            {
                RefreshOutcome::Renewed => continue,
                RefreshOutcome::Rejected => return Ok(self.expire(descriptor, outcome)),
            }
        }
    }

    async fn send(
        &self,
        descriptor: &RequestDescriptor,
        token: Option<&str>,
    ) -> Result<Response, Error> {
        let url = self.base.join(descriptor.path());
        let mut builder = self
            .context
            .http_client()
            .request(descriptor.method().clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = descriptor.body() {
            builder = builder.json(body);
        }
        debug!(method = %descriptor.method(), url = %url, "request.send");
        Ok(builder.send().await?)
    }

    /// POST to the renewal endpoint, relying on the cookie jar instead of a
    /// bearer header, and store the new token on success.
    async fn renew_token(&self) -> Result<RefreshOutcome, Error> {
        let url = self.base.join(&self.refresh_path);
        let response = self
            .context
            .http_client()
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("refresh unauthorized: status=401");
            return Ok(self.reject_refresh());
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<ApiResponse<AccessToken>>(&body) {
            Ok(ApiResponse::Result(AccessToken { access_token })) if !access_token.is_empty() => {
                info!("access token renewed (len={})", access_token.len());
                self.context.store().set_token(access_token);
                Ok(RefreshOutcome::Renewed)
            }
            Ok(ApiResponse::Result(_)) => {
                warn!(status = status.as_u16(), "refresh returned an empty access token");
                Ok(self.reject_refresh())
            }
            Ok(ApiResponse::Error(msg)) => {
                warn!(status = status.as_u16(), error = %msg, "refresh returned an error");
                Ok(self.reject_refresh())
            }
            Err(err) => {
                warn!(status = status.as_u16(), error = %err, "refresh returned a malformed body");
                Ok(self.reject_refresh())
            }
        }
    }

    fn reject_refresh(&self) -> RefreshOutcome {
        if self.on_refresh_failure.clears_token() {
            self.context.store().clear();
        }
        RefreshOutcome::Rejected
    }

    fn expire<T>(
        &self,
        descriptor: &RequestDescriptor,
        mut outcome: RequestOutcome,
    ) -> ApiResponse<T> {
        outcome.expired = true;
        outcome.log();
        if descriptor.suppresses_redirect() {
            debug!(path = descriptor.path(), "token expired; redirect suppressed");
        } else {
            self.navigator.navigate(&self.login_path);
        }
        ApiResponse::expired()
    }
}
