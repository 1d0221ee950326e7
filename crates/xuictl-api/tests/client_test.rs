#![allow(clippy::unwrap_used)]
// Integration tests for the request engine and login using wiremock.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xuictl_api::{Api, Check, Error, Method, PanelClient, PanelConfig, Session, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const UNIT: Duration = Duration::from_millis(50);
const TIMEOUT: Duration = Duration::from_millis(250);

/// Refused connections fail at once, so elapsed time is almost all backoff.
const REFUSED_UNIT: Duration = Duration::from_millis(100);

fn transport() -> TransportConfig {
    TransportConfig::default()
        .with_timeout(TIMEOUT)
        .with_backoff_unit(UNIT)
}

fn session_for(host: &str) -> Session {
    Session::new(host, "admin", SecretString::from("admin"))
}

/// A local port with nothing listening on it.
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn refused_client(port: u16, max_retries: u32) -> PanelClient {
    let transport = TransportConfig::default().with_backoff_unit(REFUSED_UNIT);
    let client =
        PanelClient::new(session_for(&format!("http://127.0.0.1:{port}")), &transport).unwrap();
    client.session().set_max_retries(max_retries);
    client
}

async fn setup() -> (MockServer, PanelClient) {
    let server = MockServer::start().await;
    let client = PanelClient::new(session_for(&server.uri()), &transport()).unwrap();
    (server, client)
}

fn ok(obj: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "msg": "", "obj": obj}))
}

fn login_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("session={token}; Path=/; HttpOnly").as_str())
        .set_body_json(json!({"success": true, "msg": "Login Successfully", "obj": null}))
}

// ── Request engine ──────────────────────────────────────────────────

#[tokio::test]
async fn test_session_cookie_sent() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(login_ok("abc123"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ok(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap();
    client
        .send(Method::Get, "/panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_cookie_without_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("cookie"));
}

#[tokio::test]
async fn test_success_false_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/panel/api/inbounds/del/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "msg": "Delete Failed: record not found",
            "obj": {"ignored": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .send(Method::Post, "panel/api/inbounds/del/9", Some(&json!({})), Check::Envelope)
        .await;

    match result {
        Err(Error::Api { message }) => assert_eq!(message, "Delete Failed: record not found"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_success_flag_fails_with_empty_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"obj": []})))
        .mount(&server)
        .await;

    let err = client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap_err();
    assert!(err.is_logical());
    assert_eq!(err.api_message(), Some(""));
}

#[tokio::test]
async fn test_skip_check_returns_raw_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/createbackup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let resp = client
        .send(Method::Get, "panel/api/inbounds/createbackup", None, Check::Skip)
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.body(), "not json at all");
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_http_error_status_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await;
    match result {
        Err(Error::Status { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "404 page not found");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

// ── Retries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeouts_then_success() {
    let (server, client) = setup().await;

    // Slower than the client timeout: the first two attempts time out.
    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ok(json!([])).set_delay(Duration::from_secs(2)))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let started = Instant::now();
    client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap();

    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    // Two full timeouts plus 1 unit after the first failure and 2 after the second.
    assert!(started.elapsed() >= TIMEOUT * 2 + UNIT * 3);
}

#[tokio::test]
async fn test_refused_twice_then_success() {
    let port = free_port();
    let client = refused_client(port, 3);

    // Attempts go out at 0, 1 and 3 units; the panel comes up in between.
    let panel = tokio::spawn(async move {
        tokio::time::sleep(REFUSED_UNIT * 3 / 2).await;
        let listener = std::net::TcpListener::bind(("127.0.0.1", port)).unwrap();
        let server = MockServer::builder().listener(listener).start().await;
        Mock::given(method("GET"))
            .and(path("/panel/api/inbounds/list"))
            .respond_with(ok(json!([])))
            .mount(&server)
            .await;
        server
    });

    let started = Instant::now();
    client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    let server = panel.await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    // 1 + 2 units of sleep, and no third sleep.
    assert!(elapsed >= REFUSED_UNIT * 3, "too fast: {elapsed:?}");
    assert!(elapsed < REFUSED_UNIT * 4, "too slow: {elapsed:?}");
}

#[tokio::test]
async fn test_retries_exhausted_on_timeouts() {
    let (server, client) = setup().await;
    client.session().set_max_retries(2);

    Mock::given(method("GET"))
        .and(path("/panel/api/inbounds/list"))
        .respond_with(ok(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let result = client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await;

    match result {
        Err(Error::RetriesExhausted { attempts, url, .. }) => {
            assert_eq!(attempts, 2);
            assert_eq!(url, format!("{}/panel/api/inbounds/list", server.uri()));
        }
        other => panic!("expected RetriesExhausted, got: {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_retries_exhausted_on_refused_connection() {
    let client = refused_client(free_port(), 4);

    let started = Instant::now();
    let err = client
        .send(Method::Get, "panel/api/inbounds/list", None, Check::Envelope)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(
        matches!(err, Error::RetriesExhausted { attempts: 4, .. }),
        "expected RetriesExhausted after 4 attempts, got: {err:?}"
    );
    assert!(!err.is_logical());
    // 1 + 2 + 3 units; doubling would be 1 + 2 + 4.
    assert!(elapsed >= REFUSED_UNIT * 6, "too fast: {elapsed:?}");
    assert!(elapsed < REFUSED_UNIT * 7, "too slow: {elapsed:?}");
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "admin", "password": "admin"})))
        .respond_with(login_ok("MTcxNjQ4"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.session().is_authenticated());
    client.login().await.unwrap();

    let token = client.session().session_token().unwrap();
    assert_eq!(token.expose_secret(), "MTcxNjQ4");
}

#[tokio::test]
async fn test_login_without_cookie_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(client.session().session_token().is_none());
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "msg": "Invalid username or password"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.login().await.unwrap_err();
    assert_eq!(err.api_message(), Some("Invalid username or password"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(login_ok("abc123"))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    client.logout();
    assert!(!client.session().is_authenticated());
}

// ── Facade ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_propagates_to_every_group() {
    let server = MockServer::start().await;
    let config = PanelConfig::new(server.uri(), "admin", SecretString::from("admin"))
        .with_transport(transport());

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(login_ok("shared"))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::connect(config).await.unwrap();
    for session in [
        api.inbound.session(),
        api.client.session(),
        api.database.session(),
    ] {
        assert_eq!(session.session_token().unwrap().expose_secret(), "shared");
    }
}

#[tokio::test]
async fn test_retry_budget_shared_by_groups() {
    let server = MockServer::start().await;
    let config = PanelConfig::new(server.uri(), "admin", SecretString::from("admin"))
        .with_max_retries(5);

    let api = Api::new(config).unwrap();
    assert_eq!(api.client.session().max_retries(), 5);

    api.set_max_retries(0);
    assert_eq!(api.inbound.session().max_retries(), 1);
}

#[test]
fn test_invalid_host_rejected() {
    let config = PanelConfig::new("not a url", "admin", SecretString::from("admin"));
    let result = Api::new(config);
    assert!(
        matches!(result, Err(Error::InvalidUrl(_))),
        "expected InvalidUrl, got: {result:?}"
    );
}
