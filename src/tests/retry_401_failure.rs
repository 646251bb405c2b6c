use crate::tests::test_support::{base_config, capture_logs, drain_logs, session, session_with};
use crate::{ApiResponse, FailedRefreshPolicy, RequestDescriptor, TOKEN_EXPIRED, WalletApi};
use reqwest::Method;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_expired_balance(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/wallet/w1/balance"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_token_expired_and_redirects_when_refresh_is_401() {
    let server = MockServer::start().await;
    mount_expired_balance(&server).await;
    mount_refresh(&server, ResponseTemplate::new(401)).await;

    let (session, navigator) = session(&server.uri(), "old");

    let (lines, guard) = capture_logs();
    let res: ApiResponse<Value> = WalletApi::new(&session)
        .get_wallet_balance("w1")
        .await
        .unwrap();
    drop(guard);

    assert_eq!(res, ApiResponse::Error(TOKEN_EXPIRED.to_string()));
    assert_eq!(navigator.paths(), vec!["/login".to_string()]);

    let logs = drain_logs(lines);
    let warn_count = logs
        .iter()
        .filter(|line| line.contains("WARN") && line.contains("status=401"))
        .count();
    assert_eq!(
        warn_count, 2,
        "should log a warning for the call and the refresh 401, got {:?}",
        logs
    );
}

#[tokio::test]
async fn suppressed_redirect_fails_quietly() {
    let server = MockServer::start().await;
    mount_expired_balance(&server).await;
    mount_refresh(&server, ResponseTemplate::new(401)).await;

    let (session, navigator) = session(&server.uri(), "old");
    let descriptor =
        RequestDescriptor::new(Method::GET, "v1/wallet/w1/balance").suppress_redirect();
    let res: ApiResponse<Value> = session.request(&descriptor).await.unwrap();

    assert!(res.is_expired());
    assert!(navigator.paths().is_empty());
}

#[tokio::test]
async fn second_401_after_renewal_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/wallet/w1/bill"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"result": {"access_token": "new"}})),
    )
    .await;

    let (session, navigator) = session(&server.uri(), "old");
    let res: ApiResponse<Value> = WalletApi::new(&session)
        .generate_wallet_bill("w1")
        .await
        .unwrap();

    assert!(res.is_expired());
    assert_eq!(navigator.paths().len(), 1);
    // the renewal itself succeeded
    assert_eq!(session.credentials().get_token().as_deref(), Some("new"));
}

#[tokio::test]
async fn malformed_refresh_body_counts_as_rejection() {
    for body in [
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
        ResponseTemplate::new(200).set_body_json(json!({"result": null})),
        ResponseTemplate::new(200).set_body_json(json!({"result": {"access_token": ""}})),
        ResponseTemplate::new(500).set_body_json(json!({"result": null, "error": "boom"})),
    ] {
        let server = MockServer::start().await;
        mount_expired_balance(&server).await;
        mount_refresh(&server, body).await;

        let (session, navigator) = session(&server.uri(), "old");
        let res: ApiResponse<Value> = WalletApi::new(&session)
            .get_wallet_balance("w1")
            .await
            .unwrap();
        assert!(res.is_expired());
        assert_eq!(navigator.paths().len(), 1);
    }
}

#[tokio::test]
async fn failed_refresh_clears_token_by_default() {
    let server = MockServer::start().await;
    mount_expired_balance(&server).await;
    mount_refresh(&server, ResponseTemplate::new(401)).await;

    let (session, _navigator) = session(&server.uri(), "old");
    let _: ApiResponse<Value> = WalletApi::new(&session)
        .get_wallet_balance("w1")
        .await
        .unwrap();

    assert_eq!(session.credentials().get_token(), None);
}

#[tokio::test]
async fn keep_policy_leaves_stale_token() {
    let server = MockServer::start().await;
    mount_expired_balance(&server).await;
    mount_refresh(&server, ResponseTemplate::new(401)).await;

    let config = base_config(&server.uri()).with_refresh_policy(FailedRefreshPolicy::Keep);
    let (session, _navigator) = session_with(config, Some("old"));
    let _: ApiResponse<Value> = WalletApi::new(&session)
        .get_wallet_balance("w1")
        .await
        .unwrap();

    assert_eq!(session.credentials().get_token().as_deref(), Some("old"));
}

#[tokio::test]
async fn zero_refresh_budget_never_calls_refresh() {
    let server = MockServer::start().await;
    mount_expired_balance(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = base_config(&server.uri()).with_max_refreshes(0);
    let (session, navigator) = session_with(config, Some("old"));
    let res: ApiResponse<Value> = WalletApi::new(&session)
        .get_wallet_balance("w1")
        .await
        .unwrap();

    assert!(res.is_expired());
    assert_eq!(navigator.paths().len(), 1);
}

#[tokio::test]
async fn missing_token_still_attempts_renewal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/wallet/w1/balance"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"balance": 1}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/wallet/w1/balance"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"result": {"access_token": "fresh"}})),
    )
    .await;

    let (session, _navigator) = session_with(base_config(&server.uri()), None);
    let res: ApiResponse<Value> = WalletApi::new(&session)
        .get_wallet_balance("w1")
        .await
        .unwrap();

    assert_eq!(res.into_result(), Ok(json!({"balance": 1})));
}
