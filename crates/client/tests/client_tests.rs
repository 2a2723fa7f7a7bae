//! Integration tests for the society HTTP client

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use society_client::{ClientError, ResponseBody, SocietyClient, probe_dev_base};
use society_core::{ApiConfig, Environment, MemoryStorage, Role, Storage, keys};

fn client_with_storage(base: &str) -> (SocietyClient, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let client = SocietyClient::builder()
        .base_url(base)
        .storage(storage.clone())
        .build()
        .unwrap();
    (client, storage)
}

#[tokio::test]
async fn builder_strips_trailing_slash_from_base() {
    let (client, _) = client_with_storage("http://localhost:8080///");
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn relative_paths_join_the_base_exactly_once() {
    let (client, _) = client_with_storage("https://api.example.com/");
    assert_eq!(
        client.resolve_url("/api/items").unwrap(),
        "https://api.example.com/api/items"
    );
}

#[tokio::test]
async fn absolute_url_with_foreign_origin_fails_fast() {
    let (client, _) = client_with_storage("https://api.example.com");

    let err = client.resolve_url("https://evil.example.net/api/items").unwrap_err();
    assert!(matches!(err, ClientError::HostMismatch { .. }));

    // Same origin passes through untouched
    let url = client
        .resolve_url("https://api.example.com/api/items")
        .unwrap();
    assert_eq!(url, "https://api.example.com/api/items");
}

#[tokio::test]
async fn get_items_uses_default_method_and_json_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let items = client.get_items().await.unwrap();
    assert_eq!(items, json!([{"id": 1}]));
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userId": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    client.sessions().save_token("tok-123");

    let me = client.me().await.unwrap();
    assert_eq!(me["userId"], 1);
}

#[tokio::test]
async fn non_json_responses_come_back_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain payload"))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let request = client.request(reqwest::Method::GET, "/api/data").unwrap();
    let body = client.execute_raw(request).await.unwrap();
    assert_eq!(body, ResponseBody::Text("plain payload".to_string()));
}

#[tokio::test]
async fn http_errors_carry_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "database is down"})),
        )
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let err = client.get_items().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.data().unwrap()["message"], "database is down");
    assert!(err.to_string().contains("database is down"));
}

#[tokio::test]
async fn unauthorized_response_clears_token_and_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "expired"})))
        .mount(&mock_server)
        .await;

    let (client, storage) = client_with_storage(&mock_server.uri());
    client.sessions().save_token("stale");
    storage.set(keys::USER_DATA, &json!({
        "userId": "9",
        "email": "sam@uni.example",
        "name": "Sam",
        "role": "student",
        "loginTime": "2026-01-01T00:00:00Z"
    }).to_string());

    let err = client.me().await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(storage.get(keys::AUTH_TOKEN), None);
    assert_eq!(storage.get(keys::USER_DATA), None);
}

#[tokio::test]
async fn forbidden_response_also_tears_down_the_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admins"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let (client, storage) = client_with_storage(&mock_server.uri());
    client.sessions().save_token("student-token");

    let err = client.list_admins().await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(storage.get(keys::AUTH_TOKEN), None);
}

#[tokio::test]
async fn slow_responses_reject_with_the_timeout_variant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = SocietyClient::builder()
        .base_url(mock_server.uri())
        .storage(storage)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.fetch_data().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }));
}

#[tokio::test]
async fn login_persists_token_and_session_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-abc",
            "userId": 7,
            "email": "sam@uni.example",
            "role": "student"
        })))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let response = client
        .login_user(&society_client::types::LoginRequest {
            email: "sam@uni.example".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.role, Some(Role::Student));
    assert_eq!(client.sessions().token(), Some("jwt-abc".to_string()));

    let record = client.sessions().session().unwrap();
    assert_eq!(record.user_id, "7");
    assert_eq!(record.role, Role::Student);
    assert_eq!(record.email, "sam@uni.example");
}

#[tokio::test]
async fn ping_reports_the_first_healthy_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "up"})))
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let report = client.ping().await;
    assert!(report.ok);
    assert_eq!(report.path_tried.as_deref(), Some("/api/health"));
    assert_eq!(
        report.response.unwrap(),
        ResponseBody::Json(json!({"status": "up"}))
    );
}

#[tokio::test]
async fn ping_with_no_healthy_path_is_not_ok_but_not_an_error() {
    let mock_server = MockServer::start().await;

    for health_path in ["/health", "/api/health", "/api/status"] {
        Mock::given(method("GET"))
            .and(path(health_path))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;
    }

    let (client, _) = client_with_storage(&mock_server.uri());
    let report = client.ping().await;
    assert!(!report.ok);
    assert_eq!(report.path_tried, None);
}

#[tokio::test]
async fn dev_probe_keeps_a_healthy_local_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    storage.set(keys::API_ENV, "dev");
    storage.set(keys::API_BASE_OVERRIDE, &mock_server.uri());
    let config = ApiConfig::resolve(None, &storage);

    let probed = probe_dev_base(config.clone()).await;
    assert_eq!(probed, config);
}

#[tokio::test]
async fn dev_probe_falls_back_to_production_when_unreachable() {
    let storage = MemoryStorage::new();
    storage.set(keys::API_ENV, "dev");
    // Nothing is listening on the default local base
    let config = ApiConfig::resolve(None, &storage);
    assert_eq!(config.environment, Environment::Development);

    let probed = probe_dev_base(config).await;
    assert_eq!(probed.environment, Environment::Production);
    assert_eq!(probed.base_url, society_core::config::PRODUCTION_BASE);
}

#[tokio::test]
async fn production_config_skips_the_dev_probe() {
    let storage = MemoryStorage::new();
    let config = ApiConfig::resolve(None, &storage);
    let probed = probe_dev_base(config.clone()).await;
    assert_eq!(probed, config);
}

#[tokio::test]
async fn item_crud_hits_the_expected_routes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/items/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "title": "x"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/items/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client_with_storage(&mock_server.uri());
    let created: Value = client.create_item(&json!({"title": "x"})).await.unwrap();
    assert_eq!(created["id"], 3);

    let updated = client.update_item("3", &json!({"title": "x"})).await.unwrap();
    assert_eq!(updated["title"], "x");

    let deleted = client.delete_item("3").await.unwrap();
    assert_eq!(deleted["deleted"], true);
}
