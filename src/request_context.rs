use std::sync::Arc;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;

use crate::credentials::CredentialStore;
use crate::errors::Error;
use crate::refresh::RefreshCoordinator;

/// Everything needed to issue, and later re-issue, one logical call.
///
/// Built once and reused verbatim on retry.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<Value>,
    suppress_redirect: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            suppress_redirect: false,
        }
    }

    /// Serialize `body` as the JSON payload.
    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Fail quietly on terminal expiry instead of routing to the login page.
    pub fn suppress_redirect(mut self) -> Self {
        self.suppress_redirect = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn suppresses_redirect(&self) -> bool {
        self.suppress_redirect
    }
}

/// Shared context for outbound requests ensuring consistent token/refresh handling.
#[derive(Clone)]
pub struct RequestDispatchContext {
    http_client: Client,
    store: Arc<CredentialStore>,
    refresh: Arc<RefreshCoordinator>,
}

impl RequestDispatchContext {
    pub fn build(http_client: Client, store: Arc<CredentialStore>) -> Self {
        Self {
            http_client,
            store,
            refresh: Arc::new(RefreshCoordinator::new()),
        }
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn store(&self) -> Arc<CredentialStore> {
        Arc::clone(&self.store)
    }

    pub fn refresh(&self) -> Arc<RefreshCoordinator> {
        Arc::clone(&self.refresh)
    }
}
