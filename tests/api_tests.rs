use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use radman::config::Config;
use std::io::Write;
use tempfile::TempDir;
use tower::ServiceExt;

/// In-memory store plus a scratch directory for log sources. The TempDir
/// must stay alive for the duration of the test.
async fn spawn_app() -> (Router, TempDir) {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(tweak: impl FnOnce(&mut Config)) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.store.url = Some("sqlite::memory:".to_string());
    config.logs.auth_log_path = dir.path().join("radius.log").display().to_string();
    config.logs.system_log_path = dir.path().join("syslog").display().to_string();
    config.logs.alert_export_path = dir.path().join("alerts.json").display().to_string();
    config.logs.audit_dir = dir.path().join("audit").display().to_string();
    tweak(&mut config);

    let state = radman::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (radman::api::router(state), dir)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(app: &Router, uri: &str, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn delete_req(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn create_payload(username: &str, password: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "password": password,
        "password_confirm": password,
    })
}

#[tokio::test]
async fn test_user_lifecycle() {
    let (app, _dir) = spawn_app().await;

    // Empty directory to start.
    let (status, body) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"], serde_json::json!([]));

    let (status, body) = post_json(
        &app,
        "/api/users",
        create_payload("alice@gym.fr", "s3cretpass"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "alice@gym.fr");
    assert_eq!(body["data"]["groupname"], "staff");

    let (status, body) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice@gym.fr");
    assert_eq!(users[0]["groupname"], "staff");

    let (status, body) = delete_req(&app, "/api/users/alice@gym.fr?confirmed=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed_entries"], 1);

    let (_, body) = get(&app, "/api/users").await;
    assert_eq!(body["data"]["users"], serde_json::json!([]));

    // Both actions left an audit trail in today's file.
    let audit_file = _dir.path().join("audit").join(format!(
        "{}.log",
        chrono::Local::now().format("%Y-%m-%d")
    ));
    let trail = std::fs::read_to_string(audit_file).unwrap();
    assert!(trail.contains("user_create | alice@gym.fr | success"));
    assert!(trail.contains("user_delete | alice@gym.fr | success"));
}

#[tokio::test]
async fn test_paged_listing() {
    let (app, _dir) = spawn_app_with(|config| config.directory.page_size = 2).await;

    for name in ["amy@gym.fr", "ben@gym.fr", "cleo@gym.fr"] {
        let (status, _) = post_json(&app, "/api/users", create_payload(name, "s3cretpass")).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/api/users?page=1").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "amy@gym.fr");
    assert_eq!(users[1]["username"], "ben@gym.fr");
    assert_eq!(body["data"]["total_pages"], 2);

    let (_, body) = get(&app, "/api/users?page=2").await;
    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "cleo@gym.fr");

    // Page numbers are 1-based; 0 is clamped to the first page.
    let (_, body) = get(&app, "/api/users?page=0").await;
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 2);

    // Past the end is empty, not an error.
    let (status, body) = get(&app, "/api/users?page=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"], serde_json::json!([]));
}

#[tokio::test]
async fn test_create_validation_rejections_leave_no_rows() {
    let (app, _dir) = spawn_app().await;

    // Username must match the mail pattern.
    let (status, body) = post_json(
        &app,
        "/api/users",
        create_payload("not-an-email", "s3cretpass"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Password below minimum length.
    let (status, _) = post_json(&app, "/api/users", create_payload("bob@gym.fr", "short")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Confirmation mismatch.
    let (status, _) = post_json(
        &app,
        "/api/users",
        serde_json::json!({
            "username": "bob@gym.fr",
            "password": "s3cretpass",
            "password_confirm": "different1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty username reports the username, not the pattern.
    let (status, body) = post_json(&app, "/api/users", create_payload("", "s3cretpass")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().to_lowercase().contains("username"));

    // None of the rejections wrote anything.
    let (_, body) = get(&app, "/api/users").await;
    assert_eq!(body["data"]["users"], serde_json::json!([]));
}

#[tokio::test]
async fn test_duplicate_username_conflict() {
    let (app, _dir) = spawn_app().await;

    let (status, _) = post_json(
        &app,
        "/api/users",
        create_payload("carol@gym.fr", "s3cretpass"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/api/users",
        create_payload("carol@gym.fr", "otherpass9"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // The original account is untouched.
    let (_, body) = get(&app, "/api/users").await;
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (app, _dir) = spawn_app().await;

    post_json(
        &app,
        "/api/users",
        create_payload("dave@gym.fr", "s3cretpass"),
    )
    .await;

    let (status, _) = delete_req(&app, "/api/users/dave@gym.fr").await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);

    let (status, _) = delete_req(&app, "/api/users/dave@gym.fr?confirmed=false").await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);

    // Still there.
    let (_, body) = get(&app, "/api/users").await;
    assert_eq!(body["data"]["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_user() {
    let (app, _dir) = spawn_app().await;

    let (status, _) = delete_req(&app, "/api/users/ghost@gym.fr?confirmed=true").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logs_missing_file_is_advisory_not_error() {
    let (app, _dir) = spawn_app().await;

    let (status, body) = get(&app, "/api/logs/auth").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["lines"], serde_json::json!([]));
    assert!(body["data"]["advisory"].is_string());
}

#[tokio::test]
async fn test_logs_tail_classified_most_recent_first() {
    let (app, dir) = spawn_app().await;

    let mut file = std::fs::File::create(dir.path().join("radius.log")).unwrap();
    writeln!(file, "Info: Ready to process requests").unwrap();
    writeln!(file, "Auth: Login OK: [alice@gym.fr]").unwrap();
    writeln!(file, "Auth: Login incorrect: [mallory@gym.fr]").unwrap();
    drop(file);

    let (status, body) = get(&app, "/api/logs/auth").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], true);

    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["class"], "failure");
    assert_eq!(lines[1]["class"], "success");
    assert_eq!(lines[2]["class"], "info");

    assert_eq!(body["data"]["summary"]["total"], 3);
    assert_eq!(body["data"]["summary"]["success"], 1);
    assert_eq!(body["data"]["summary"]["failure"], 1);
}

#[tokio::test]
async fn test_logs_search_filters_lines_not_summary() {
    let (app, dir) = spawn_app().await;

    let mut file = std::fs::File::create(dir.path().join("radius.log")).unwrap();
    writeln!(file, "Auth: Login OK: [alice@gym.fr]").unwrap();
    writeln!(file, "Auth: Login incorrect: [mallory@gym.fr]").unwrap();
    drop(file);

    let (_, body) = get(&app, "/api/logs/auth?search=mallory").await;
    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(body["data"]["summary"]["total"], 2);
}

#[tokio::test]
async fn test_logs_unknown_source() {
    let (app, _dir) = spawn_app().await;

    let (status, _) = get(&app, "/api/logs/kernel").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alerts_feed_tiers_and_skipped() {
    let (app, dir) = spawn_app().await;

    let mut file = std::fs::File::create(dir.path().join("alerts.json")).unwrap();
    writeln!(file, r#"{{"rule": {{"level": 3, "description": "low noise"}}}}"#).unwrap();
    writeln!(file, r#"{{"rule": {{"level": 7, "description": "auth probe"}}}}"#).unwrap();
    writeln!(file, r#"{{"rule": {{"level": 12, "description": "brute force"}}}}"#).unwrap();
    writeln!(file, "{{\"torn").unwrap();
    drop(file);

    let (status, body) = get(&app, "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], true);
    assert_eq!(body["data"]["skipped"], 1);
    assert_eq!(body["data"]["summary"]["total"], 3);
    assert_eq!(body["data"]["summary"]["high"], 1);
    assert_eq!(body["data"]["summary"]["medium"], 1);
    assert_eq!(body["data"]["summary"]["low"], 1);

    // Newest first.
    let alerts = body["data"]["alerts"].as_array().unwrap();
    assert_eq!(alerts[0]["rule"]["level"], 12);

    // Tier filter narrows both the alerts and the summary beside them.
    let (_, body) = get(&app, "/api/alerts?level=high").await;
    let alerts = body["data"]["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["rule"]["description"], "brute force");
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["high"], 1);
    assert_eq!(body["data"]["summary"]["medium"], 0);
    assert_eq!(body["data"]["summary"]["low"], 0);

    // Substring search over the raw document, summary following suit.
    let (_, body) = get(&app, "/api/alerts?search=probe").await;
    assert_eq!(body["data"]["alerts"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["medium"], 1);

    // Unknown tier name is a client error.
    let (status, _) = get(&app, "/api/alerts?level=critical").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alerts_missing_export() {
    let (app, _dir) = spawn_app().await;

    let (status, body) = get(&app, "/api/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);
    assert_eq!(body["data"]["alerts"], serde_json::json!([]));
}

#[tokio::test]
async fn test_system_status() {
    let (app, _dir) = spawn_app().await;

    let (status, body) = get(&app, "/api/system/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["auth_log"], false);
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_health_live() {
    let (app, _dir) = spawn_app().await;

    let (status, body) = get(&app, "/api/system/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");
}
