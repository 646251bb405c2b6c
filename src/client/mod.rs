use std::sync::Arc;

use crate::endpoint::BaseUrl;
use crate::navigation::Navigator;
use crate::refresh::FailedRefreshPolicy;
use crate::request_context::RequestDispatchContext;

mod impls;

/// An authenticated API session.
///
/// Owns the credential store for its lifetime: [`ApiSession::sign_in`]
/// installs a token, [`ApiSession::sign_out`] tears it down. Every call goes
/// through [`ApiSession::request`], which renews an expired token at most
/// `max_refreshes` times before giving up with `Token expired`.
#[derive(Clone)]
pub struct ApiSession {
    base: BaseUrl,
    refresh_path: String,
    login_path: String,
    max_refreshes: u8,
    on_refresh_failure: FailedRefreshPolicy,
    context: RequestDispatchContext,
    navigator: Arc<dyn Navigator>,
}
