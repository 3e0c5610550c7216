//! Test harness: the full router over in-memory stores

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use spice_ledger::config::{
    AdminConfig, AuthConfig, Config, DatabaseConfig, JwtConfig, RedisConfig, ServerConfig,
};
use spice_ledger::repositories::{InMemoryLedgerStore, Repositories};
use spice_ledger::services::AuthService;
use spice_ledger::{create_app, AppState};

pub const ADMIN_EMAIL: &str = "admin@spice.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 86400,
        },
        // Lowest cost bcrypt accepts
        auth: AuthConfig { bcrypt_cost: 4 },
        admin: AdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            name: "Test Admin".to_string(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryLedgerStore>,
}

impl TestApp {
    /// Router with a seeded admin account
    pub async fn spawn() -> Self {
        let config = test_config();
        let store = Arc::new(InMemoryLedgerStore::default());
        let repos = Repositories::with_store(store.clone());

        AuthService::new(repos.users.clone(), &config)
            .seed_admin(&config)
            .await
            .expect("seed admin");

        let router = create_app(AppState::new(config, repos));
        Self { router, store }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login: {body}");
        body["access_token"].as_str().expect("access token").to_string()
    }

    /// Register a trader and return their access token
    pub async fn trader_token(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": "Trader", "email": email, "password": "pepper-123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register: {body}");

        let (status, body) = self.login(email, "pepper-123").await;
        assert_eq!(status, StatusCode::OK, "login: {body}");
        body["access_token"].as_str().expect("access token").to_string()
    }

    pub async fn create_product(&self, admin: &str, name: &str) -> Uuid {
        let (status, body) = self
            .post("/api/products", admin, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create product: {body}");
        id_of(&body)
    }

    pub async fn create_grade(&self, admin: &str, product_id: Uuid, name: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/api/grades",
                admin,
                json!({ "product_id": product_id, "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create grade: {body}");
        id_of(&body)
    }

    pub async fn set_price(
        &self,
        admin: &str,
        date: &str,
        product_id: Uuid,
        grade_id: Uuid,
        price: &str,
    ) {
        let (status, body) = self
            .post(
                "/api/prices",
                admin,
                json!({
                    "date": date,
                    "product_id": product_id,
                    "grade_id": grade_id,
                    "price_per_kg": price,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "set price: {body}");
    }

    pub async fn buy(
        &self,
        token: &str,
        product_id: Uuid,
        grade_id: Uuid,
        date: &str,
        quantity: &str,
        unit_cost: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/lots",
            token,
            json!({
                "product_id": product_id,
                "grade_id": grade_id,
                "date": date,
                "quantity_kg": quantity,
                "unit_cost": unit_cost,
            }),
        )
        .await
    }

    pub async fn sell(
        &self,
        token: &str,
        product_id: Uuid,
        grade_id: Uuid,
        date: &str,
        quantity: &str,
        unit_price: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/sales",
            token,
            json!({
                "product_id": product_id,
                "grade_id": grade_id,
                "date": date,
                "quantity_kg": quantity,
                "unit_price": unit_price,
            }),
        )
        .await
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("id field")
}

/// Decimals travel as JSON strings
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or_else(|| panic!("not a decimal: {value}"))
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
