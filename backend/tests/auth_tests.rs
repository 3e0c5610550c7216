//! Authentication and authorization tests
//!
//! Covers the register/login/refresh flows, role enforcement on admin
//! routes, and property tests for the account input rules.

mod common;

use axum::http::{Method, StatusCode};
use proptest::prelude::*;
use serde_json::json;

use common::{error_code, TestApp, ADMIN_EMAIL};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net|in)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate passwords that are too short
fn short_password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,7}"
}

proptest! {
    /// Well-formed emails always pass validation
    #[test]
    fn prop_valid_emails_accepted(email in email_strategy()) {
        prop_assert!(shared::validate_email(&email).is_ok());
    }

    /// Emails without an @ are rejected
    #[test]
    fn prop_emails_without_at_rejected(local in "[a-z]{3,10}", domain in "[a-z]{3,8}\\.com") {
        let email = format!("{}{}", local, domain);
        prop_assert!(shared::validate_email(&email).is_err());
    }

    #[test]
    fn prop_long_passwords_accepted(password in password_strategy()) {
        prop_assert!(shared::validate_password(&password).is_ok());
    }

    #[test]
    fn prop_short_passwords_rejected(password in short_password_strategy()) {
        prop_assert!(shared::validate_password(&password).is_err());
    }
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn register_creates_a_regular_user() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Saffron Co", "email": "Saffron@Example.com", "password": "crocus-99" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
    assert_eq!(body["email"], "saffron@example.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    app.trader_token("clove@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Other", "email": "clove@example.com", "password": "another-1" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Mace", "email": "mace@example.com", "password": "short" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "password");
}

#[tokio::test]
async fn register_rejects_blank_and_overlong_names() {
    let app = TestApp::spawn().await;

    for name in ["   ".to_string(), "x".repeat(101)] {
        let (status, body) = app
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": "mace@example.com", "password": "long-enough" })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "name");
    }

    // A padded name within the limit is stored trimmed
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": format!("  {}  ", "x".repeat(100)), "email": "mace@example.com", "password": "long-enough" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "x".repeat(100));
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;

    let (status, body) = app.login(ADMIN_EMAIL, "not-the-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");

    let (status, body) = app.login("nobody@example.com", "whatever-1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn refresh_token_is_single_use() {
    let app = TestApp::spawn().await;
    let (_, tokens) = app.login(ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap().to_string();

    let refresh = || {
        app.request(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
    };

    let (status, body) = refresh().await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");

    let (status, body) = refresh().await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

// ============================================================================
// Role enforcement
// ============================================================================

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(Method::GET, "/api/inventory/current", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let (status, body) = app.get("/api/products", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn regular_users_cannot_reach_admin_operations() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let trader = app.trader_token("pepper@example.com").await;
    let product_id = app.create_product(&admin, "Black Pepper").await;
    let grade_id = app.create_grade(&admin, product_id, "TGSEB").await;

    let (status, _) = app.get("/api/admin/stats", &trader).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/admin/dashboard", &trader).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/products", &trader, json!({ "name": "Nutmeg" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");

    let (status, _) = app
        .post(
            "/api/grades",
            &trader,
            json!({ "product_id": product_id, "name": "MG1" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/prices",
            &trader,
            json!({
                "date": "2024-05-01",
                "product_id": product_id,
                "grade_id": grade_id,
                "price_per_kg": "10",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads stay open to every authenticated user
    let (status, products) = app.get("/api/products", &trader).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn admin_stats_counts_users() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.trader_token("one@example.com").await;
    app.trader_token("two@example.com").await;

    let (status, body) = app.get("/api/admin/stats", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 3);
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::spawn().await;
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
