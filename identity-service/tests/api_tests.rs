mod common;

use auth::Role;
use common::TestApp;
use identity_service::domain::employee::models::EmailAddress;
use identity_service::domain::employee::models::Employee;
use identity_service::domain::employee::models::EmployeeId;
use identity_service::domain::employee::models::EmployeeStatus;
use identity_service::domain::employee::ports::EmployeeRepository;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

async fn create_ana(app: &TestApp) -> String {
    let hr_token = app.bearer_for(Role::HrManager, None);

    let response = app
        .post("/api/v1/employees")
        .bearer_auth(&hr_token)
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Petrova",
            "email": "ana@x.com"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"]["id"].as_str().expect("missing id").to_string()
}

#[tokio::test]
async fn test_end_to_end_provisioning_and_login() {
    let app = TestApp::spawn().await;

    let employee_id = create_ana(&app).await;

    // Provisioning delivered exactly one setup notification to Ana
    let secret = app
        .setup_secret_for("ana@x.com")
        .expect("no setup notification delivered");
    assert_eq!(app.notifier.sent().len(), 1);

    // The account cannot log in before the password is set
    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["message"],
        "Please set your password before logging in."
    );

    // The link is valid before consumption
    let response = app
        .get(&format!("/api/v1/auth/validate-token?token={}", secret))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Consume the token
    let response = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["message"],
        "Password set successfully. You can now log in."
    );

    // Login now succeeds and the claim carries Ana's facts
    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    let access_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let claim = app.session_codec.decode(&access_token).unwrap();
    assert_eq!(claim.role, Role::Employee);
    assert_eq!(claim.employee_id.unwrap().to_string(), employee_id);

    // And the self endpoint returns Ana's record
    let response = app
        .get("/api/v1/employees/me")
        .bearer_auth(&access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["email"], "ana@x.com");
    assert_eq!(body["data"]["id"], employee_id);
}

#[tokio::test]
async fn test_unknown_token_is_a_generic_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": "definitely-not-a-token", "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid or expired token.");
}

#[tokio::test]
async fn test_second_consumption_of_same_token_fails_identically() {
    let app = TestApp::spawn().await;

    create_ana(&app).await;
    let secret = app.setup_secret_for("ana@x.com").unwrap();

    let first = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Same secret, same generic rejection as an unknown one
    let second = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "Different1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid or expired token.");

    // The probe agrees
    let probe = app
        .get(&format!("/api/v1/auth/validate-token?token={}", secret))
        .send()
        .await
        .unwrap();
    assert_eq!(probe.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weak_password_is_rejected_without_burning_the_token() {
    let app = TestApp::spawn().await;

    create_ana(&app).await;
    let secret = app.setup_secret_for("ana@x.com").unwrap();

    let response = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The token survived the rejected attempt
    let response = app
        .post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_invalid_credentials() {
    let app = TestApp::spawn().await;

    create_ana(&app).await;
    let secret = app.setup_secret_for("ana@x.com").unwrap();
    app.post("/api/v1/auth/set-password")
        .json(&json!({ "token": secret, "password": "P@ssw0rd1" }))
        .send()
        .await
        .unwrap();

    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_employee_role_is_denied_across_administrative_namespaces() {
    let app = TestApp::spawn().await;
    let employee_token = app.bearer_for(Role::Employee, Some(Uuid::new_v4()));

    for path in [
        "/api/v1/admin/users",
        "/api/v1/admin",
        "/api/v1/governance/policies",
        "/api/v1/finance/ledger",
        "/api/v1/payroll/runs",
    ] {
        let get = app
            .get(path)
            .bearer_auth(&employee_token)
            .send()
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::FORBIDDEN, "GET {}", path);

        let post = app
            .post(path)
            .bearer_auth(&employee_token)
            .json(&json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(post.status(), StatusCode::FORBIDDEN, "POST {}", path);
    }
}

#[tokio::test]
async fn test_employee_role_cannot_create_employees() {
    let app = TestApp::spawn().await;
    let employee_token = app.bearer_for(Role::Employee, Some(Uuid::new_v4()));

    let response = app
        .post("/api/v1/employees")
        .bearer_auth(&employee_token)
        .json(&json!({
            "first_name": "Eve",
            "last_name": "Intruder",
            "email": "eve@x.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_or_garbage_bearer_is_unauthenticated() {
    let app = TestApp::spawn().await;

    let missing = app.get("/api/v1/employees/me").send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .get("/api/v1/employees/me")
        .bearer_auth("not.a.session")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_elevated_roles_cannot_use_self_service_surface() {
    let app = TestApp::spawn().await;
    let admin_token = app.bearer_for(Role::Admin, None);

    let response = app
        .get("/api/v1/attendance/me")
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_self_service_records_are_scoped_to_the_claim() {
    let app = TestApp::spawn().await;

    // Employee record on file, session forged directly for it
    let employee_id = EmployeeId::new();
    let employee = Employee {
        id: employee_id,
        first_name: "Ana".to_string(),
        last_name: "Petrova".to_string(),
        email: EmailAddress::new("ana@x.com".to_string()).unwrap(),
        status: EmployeeStatus::Active,
        created_at: chrono::Utc::now(),
    };
    EmployeeRepository::create(&app.store, employee).await.unwrap();

    let token = app.bearer_for(Role::Employee, Some(employee_id.0));

    // Mark attendance
    let response = app
        .post("/api/v1/attendance/me")
        .bearer_auth(&token)
        .json(&json!({ "status": "PRESENT", "check_in": "09:00", "check_out": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second mark the same day is rejected
    let response = app
        .post("/api/v1/attendance/me")
        .bearer_auth(&token)
        .json(&json!({ "status": "PRESENT", "check_in": "09:05", "check_out": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Apply for leave and read it back
    let response = app
        .post("/api/v1/leave/me")
        .bearer_auth(&token)
        .json(&json!({
            "from_date": "2026-08-10",
            "to_date": "2026-08-12",
            "kind": "ANNUAL"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "PENDING");

    let response = app
        .get("/api/v1/leave/me")
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Empty balance comes back as zeros, not 404
    let response = app
        .get("/api/v1/leave/balance/me")
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["remaining_days"], 0.0);

    // Timesheet total is derived server-side
    let response = app
        .post("/api/v1/timesheets/me")
        .bearer_auth(&token)
        .json(&json!({
            "week_start": "2026-08-03",
            "hours": [8.0, 8.0, 8.0, 8.0, 6.5]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["total_hours"], 38.5);

    // A different employee's session sees none of it
    let other_token = app.bearer_for(Role::Employee, Some(Uuid::new_v4()));
    let response = app
        .get("/api/v1/leave/me")
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_set_password_has_exactly_one_winner() {
    let app = TestApp::spawn().await;

    create_ana(&app).await;
    let secret = app.setup_secret_for("ana@x.com").unwrap();

    let attempts = 12;
    let mut handles = Vec::new();
    for i in 0..attempts {
        let client = app.api_client.clone();
        let url = format!("{}/api/v1/auth/set-password", app.address);
        let secret = secret.clone();

        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "token": secret, "password": format!("P@ssw0rd{}", i) }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut winners = 0;
    let mut losers = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => winners += 1,
            StatusCode::BAD_REQUEST => losers += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(losers, attempts - 1);

    // Whatever password won, the identity ended up active exactly once.
    let response = app
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "nonsense" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_provisioning_is_idempotent_across_duplicate_creation() {
    let app = TestApp::spawn().await;
    let hr_token = app.bearer_for(Role::HrManager, None);

    create_ana(&app).await;

    // Same email again: employee creation conflicts, and no second setup
    // notification goes out.
    let response = app
        .post("/api/v1/employees")
        .bearer_auth(&hr_token)
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Petrova",
            "email": "ana@x.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(app.notifier.sent().len(), 1);
}
