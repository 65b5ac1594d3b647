use http::uri::Scheme;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const THROWAWAY_PATH: &str = "^/api/v1/apps/app-1/users/by/external_id/[0-9a-f-]+$";

fn client_for(server: &MockServer) -> Client {
    let uri = Url::parse(&server.uri()).expect("mock server uri");
    Client::builder(Credentials::new("test-key", "app-1"))
        .with_scheme(Scheme::HTTP)
        .with_host(uri.host_str().expect("host").to_string())
        .with_port(uri.port().expect("port"))
        .build()
        .expect("client should build")
}

#[tokio::test]
async fn test_create_user_sends_expected_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/app-1/users"))
        .and(header("authorization", "Basic test-key"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({
            "properties": { "language": "en", "tags": { "plan": "premium" } },
            "identity": { "external_id": "user_1" },
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "identity": { "external_id": "user_1", "onesignal_id": "a1b2c3" },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = CreateUser::new(UserAlias::external_id("user_1")).with_tag("plan", "premium");
    let response = client.create_user(&request).await.expect("request succeeds");

    assert_eq!(response.status(), 201);
    assert!(response.is_success());
    assert_eq!(
        response.json(),
        Some(&json!({
            "identity": { "external_id": "user_1", "onesignal_id": "a1b2c3" },
        }))
    );
}

#[tokio::test]
async fn test_create_user_validation_skips_network() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let result = client
        .create_user(&CreateUser::new(UserAlias::external_id("")))
        .await;

    assert!(matches!(
        result,
        Err(Error::Validation { field: "alias_id", .. })
    ));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_view_user_hits_alias_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/apps/app-1/users/by/external_id/user_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "language": "en" },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .view_user(&UserAlias::external_id("user_1"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_delete_user_with_empty_body_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/apps/app-1/users/by/external_id/user_1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .delete_user(&UserAlias::external_id("user_1"))
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 204);
    assert_eq!(response.body(), &ResponseBody::Empty);
}

#[tokio::test]
async fn test_create_subscription_sends_wrapped_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/api/v1/apps/app-1/users/by/external_id/user_1/subscriptions",
        ))
        .and(body_json(json!({
            "subscription": {
                "type": "AndroidPush",
                "token": "tok123",
                "enabled": true,
                "session_time": 60,
                "session_count": 1,
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "sub-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let subscription = Subscription::new(payload::SubscriptionChannel::AndroidPush, "tok123");
    let response = client
        .create_subscription(&UserAlias::external_id("user_1"), &subscription)
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_send_push_notification_includes_app_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/notifications"))
        .and(body_json(json!({
            "include_aliases": { "external_id": ["user_1"] },
            "target_channel": "push",
            "contents": { "en": "hello" },
            "en": "greetings",
            "app_id": "app-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "notif-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notification = PushNotification::new(["user_1"])
        .with_content("en", "hello")
        .with_heading("en", "greetings");
    let response = client
        .send_push_notification(&notification)
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_non_2xx_status_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/notifications"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "errors": ["rate limited"],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let notification = PushNotification::new(["user_1"]).with_content("en", "hello");
    let response = client
        .send_push_notification(&notification)
        .await
        .expect("a 429 is a normal response, not an error");

    assert_eq!(response.status(), 429);
    assert!(!response.is_success());
    assert_eq!(response.json(), Some(&json!({ "errors": ["rate limited"] })));
}

#[tokio::test]
async fn test_invalid_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/apps/app-1/users/by/external_id/user_1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.view_user(&UserAlias::external_id("user_1")).await;

    match result {
        Err(Error::Decode { body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_kept_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/apps/app-1/users/by/external_id/user_1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("pong", "text/plain"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .view_user(&UserAlias::external_id("user_1"))
        .await
        .expect("request succeeds");

    assert_eq!(response.body(), &ResponseBody::Text("pong".to_string()));
}

#[tokio::test]
async fn test_check_app_id_valid_happy_path_deletes_throwaway_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/app-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let valid = client.check_app_id_valid().await.expect("probe succeeds");

    assert!(valid);
}

#[tokio::test]
async fn test_check_app_id_valid_still_deletes_when_view_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/app-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["user not found"],
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The cleanup delete must run exactly once despite the failed view.
    Mock::given(method("DELETE"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let valid = client.check_app_id_valid().await.expect("probe succeeds");

    assert!(!valid);
}

#[tokio::test]
async fn test_check_api_key_valid_reports_unauthorized_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/app-1/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": ["invalid key"],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let valid = client.check_api_key_valid().await.expect("probe succeeds");

    assert!(!valid);
}

#[tokio::test]
async fn test_check_api_key_valid_accepts_working_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/apps/app-1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(THROWAWAY_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let valid = client.check_api_key_valid().await.expect("probe succeeds");

    assert!(valid);
}
