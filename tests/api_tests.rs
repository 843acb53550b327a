//! API integration tests
//!
//! These run against a live server on localhost:8080 with a migrated
//! database. Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register an admin account with a unique email and return a bearer token
async fn get_admin_token(client: &Client) -> String {
    let email = format!(
        "admin-{}@gatepass.test",
        chrono::Utc::now().timestamp_micros()
    );

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test Admin",
            "email": email,
            "password": "admin-password",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "admin-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a visitor and return its id
async fn create_visitor(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/visitors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Jordan Test",
            "email": "jordan@example.com",
            "phone": "+15550100"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No visitor ID")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let email = format!(
        "user-{}@gatepass.test",
        chrono::Utc::now().timestamp_micros()
    );

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "secret-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "employee");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@gatepass.test",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/visitors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_visitor() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    let response = client
        .get(format!("{}/visitors/{}", BASE_URL, visitor_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Jordan Test");
}

#[tokio::test]
#[ignore]
async fn test_appointment_approval_flow() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    // Create appointment
    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "scheduled_date": "2026-09-01T10:00:00Z",
            "notes": "Quarterly review"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["appointment"]["status"], "pending");
    let appointment_id = body["appointment"]["id"].as_i64().expect("No appointment ID");

    // Approve it
    let response = client
        .patch(format!("{}/appointments/{}/approve", BASE_URL, appointment_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["appointment"]["status"], "approved");

    // Approving again must fail: approved is terminal
    let response = client
        .patch(format!("{}/appointments/{}/approve", BASE_URL, appointment_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_pass_check_in_check_out_flow() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    // Issue a pass valid today
    let now = chrono::Utc::now();
    let response = client
        .post(format!("{}/passes", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "valid_from": now.to_rfc3339(),
            "valid_to": now.to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let pass_id = body["pass"]["id"].as_str().expect("No pass ID").to_string();
    assert!(body["pass"]["qr_code"]
        .as_str()
        .expect("No QR code")
        .starts_with("data:image/png;base64,"));

    // Check in
    let response = client
        .post(format!("{}/checklogs/checkin", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["already_checked_in"], false);
    assert_eq!(body["check_log"]["location"], "Main Entrance");

    // A second scan reports the existing open log instead of failing
    let response = client
        .post(format!("{}/checklogs/checkin", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["already_checked_in"], true);

    // Check out
    let response = client
        .post(format!("{}/checklogs/checkout", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["duration"].is_string());
    assert!(body["check_log"]["check_out_time"].is_string());

    // Checking out again finds no open log
    let response = client
        .post(format!("{}/checklogs/checkout", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_check_in_outside_validity_window() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    // Pass valid only next week
    let response = client
        .post(format!("{}/passes", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "valid_from": (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339(),
            "valid_to": (chrono::Utc::now() + chrono::Duration::days(8)).to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let pass_id = body["pass"]["id"].as_str().expect("No pass ID").to_string();

    let response = client
        .post(format!("{}/checklogs/checkin", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_issue_pass_with_inverted_window() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    let response = client
        .post(format!("{}/passes", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "valid_from": "2026-09-02T00:00:00Z",
            "valid_to": "2026-09-01T00:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_revoked_pass_cannot_check_in() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let visitor_id = create_visitor(&client, &token).await;

    let now = chrono::Utc::now();
    let response = client
        .post(format!("{}/passes", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "visitor_id": visitor_id,
            "valid_from": now.to_rfc3339(),
            "valid_to": now.to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let pass_id = body["pass"]["id"].as_str().expect("No pass ID").to_string();

    let response = client
        .patch(format!("{}/passes/{}/revoke", BASE_URL, pass_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["pass"]["status"], "revoked");
    assert_eq!(body["pass"]["is_active"], false);

    let response = client
        .post(format!("{}/checklogs/checkin", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "pass_id": pass_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_today_and_stats() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/checklogs/today", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total"].is_number());
    assert!(body["active"].is_array());
    assert!(body["completed"].is_array());

    let response = client
        .get(format!("{}/checklogs/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["today"].is_number());
    assert!(body["this_week"].is_number());
    assert!(body["this_month"].is_number());
    assert!(body["active_now"].is_number());
    assert!(body["hourly_distribution"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_check_logs_require_security_role() {
    let client = Client::new();
    let email = format!(
        "employee-{}@gatepass.test",
        chrono::Utc::now().timestamp_micros()
    );

    // Default registration role is employee
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Plain Employee",
            "email": email,
            "password": "secret-password"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret-password" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("No token").to_string();

    let response = client
        .get(format!("{}/checklogs/today", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
