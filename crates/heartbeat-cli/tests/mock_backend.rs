//! CLI integration tests against a mock backend.
//!
//! Each test runs the `heartbeat` binary with its own data directory, so the
//! session file carries state between invocations the way it does for a
//! real user.

mod common;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api_url, run_cli_with_env, run_cli_with_env_failure, run_cli_with_env_success};

fn user_json() -> Value {
    json!({
        "id": 1,
        "username": "alice",
        "partner_id": null,
        "invitation_code": "INV123",
        "score": 7,
        "partner": null
    })
}

fn task_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "is_active": true,
        "creator_id": 1,
        "creator": user_json()
    })
}

/// Mount login returning `A1`/`R1` and a `/users/me` that accepts `A1`.
async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "token_type": "bearer"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(server)
        .await;
}

fn login(home: &std::path::Path, api: &str) -> String {
    run_cli_with_env_success(
        &["auth", "login", "--username", "alice", "--password", "secret"],
        home,
        api,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_whoami_offline() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();

    let stdout = login(home.path(), &api);
    assert!(stdout.contains("Logged in as alice"));
    assert!(stdout.contains("INV123"));

    let stdout = run_cli_with_env_success(&["auth", "whoami", "--offline"], home.path(), &api);
    assert!(stdout.contains("alice"));
    assert!(stdout.contains("7"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_remembers_api_url() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();

    run_cli_with_env_success(
        &[
            "auth", "login", "--api", &api, "--username", "alice", "--password", "secret",
        ],
        home.path(),
        &api,
    );

    // Without --api or HEARTBEAT_API the stored URL is used.
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_heartbeat"))
        .args(["auth", "whoami", "--json"])
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("HEARTBEAT_API")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "whoami failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let user: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(user["username"], "alice");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_password_fails_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Incorrect username or password"
        })))
        .mount(&server)
        .await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();

    let stderr = run_cli_with_env_failure(
        &["auth", "login", "--username", "alice", "--password", "wrong"],
        home.path(),
        &api,
    );
    assert!(stderr.contains("Incorrect username or password"));

    let stderr = run_cli_with_env_failure(&["tasks", "list"], home.path(), &api);
    assert!(stderr.contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_require_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();

    let stderr = run_cli_with_env_failure(&["tasks", "list"], home.path(), &api);
    assert!(stderr.contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_refreshed_across_invocations() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "Morning run"),
            task_json(2, "Read a chapter")
        ])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(query_param("refresh_token", "R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A2",
            "refresh_token": "R2",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_url(&server);
    let home = TempDir::new().unwrap();
    login(home.path(), &api);

    let stdout = run_cli_with_env_success(&["tasks", "list"], home.path(), &api);
    assert!(stdout.contains("Morning run"));
    assert!(stdout.contains("Read a chapter"));

    // The refreshed token was persisted, so no second refresh happens.
    let stdout = run_cli_with_env_success(&["tasks", "list", "--json"], home.path(), &api);
    let first: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["title"], "Morning run");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid refresh token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_url(&server);
    let home = TempDir::new().unwrap();
    login(home.path(), &api);

    let stderr = run_cli_with_env_failure(&["tasks", "list"], home.path(), &api);
    assert!(stderr.contains("heartbeat auth login"));
    assert!(stderr.contains("Invalid refresh token"));

    let stderr = run_cli_with_env_failure(&["auth", "whoami", "--offline"], home.path(), &api);
    assert!(stderr.contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();
    login(home.path(), &api);

    let stdout = run_cli_with_env_success(&["auth", "logout"], home.path(), &api);
    assert!(stdout.contains("Logged out"));

    let stderr = run_cli_with_env_failure(&["auth", "whoami"], home.path(), &api);
    assert!(stderr.contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;
    let api = api_url(&server);
    let home = TempDir::new().unwrap();

    let stdout = run_cli_with_env_success(
        &["auth", "register", "--username", "alice", "--password", "secret"],
        home.path(),
        &api,
    );
    assert!(stdout.contains("Registered alice"));
    assert!(stdout.contains("INV123"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_get_and_update_task() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .and(header("authorization", "Bearer A1"))
        .and(body_json(json!({"title": "Stretch", "description": "10 minutes"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "Stretch",
            "description": "10 minutes",
            "is_active": true,
            "creator_id": 1,
            "creator": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Stretch")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/5"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "title": "Stretch",
            "description": null,
            "is_active": false,
            "creator_id": 1,
            "creator": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_url(&server);
    let home = TempDir::new().unwrap();
    login(home.path(), &api);

    let stdout = run_cli_with_env_success(
        &["tasks", "create", "Stretch", "--description", "10 minutes"],
        home.path(),
        &api,
    );
    assert!(stdout.contains("Created task 5"));

    let stdout = run_cli_with_env_success(&["tasks", "get", "5", "--json"], home.path(), &api);
    let task: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(task["title"], "Stretch");

    let stdout = run_cli_with_env_success(&["tasks", "update", "5", "--done"], home.path(), &api);
    assert!(stdout.contains("Updated task 5"));
    assert!(stdout.contains("[done]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_task_reports_detail() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/tasks/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Task not found"
        })))
        .mount(&server)
        .await;

    let api = api_url(&server);
    let home = TempDir::new().unwrap();
    login(home.path(), &api);

    let stderr = run_cli_with_env_failure(&["tasks", "get", "42"], home.path(), &api);
    assert!(stderr.contains("Task not found"));

    // A 404 does not end the session.
    run_cli_with_env_success(&["auth", "whoami", "--offline"], home.path(), &api);
}

#[test]
fn test_update_without_changes_is_rejected() {
    let home = TempDir::new().unwrap();
    let stderr = run_cli_with_env_failure(
        &["tasks", "update", "5"],
        home.path(),
        "http://127.0.0.1:8000",
    );
    assert!(stderr.contains("Nothing to update"));
}

#[test]
fn test_invalid_task_id_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = run_cli_with_env(&["tasks", "get", "abc"], home.path(), "http://127.0.0.1:8000");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid task id"));
}
