//! Authentication service for user registration, login, and token management

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

use shared::models::{NewUser, Role, User};
use shared::validation::{validate_email, validate_name, validate_password};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::repositories::UserRepository;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    bcrypt_cost: u32,
}

/// Input for registering a new account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    /// Checked after trimming in [`AuthService::register`]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// `admin` or `user`
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            users,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }

    /// Register a new account with the `user` role
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        input.validate()?;
        validate_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        let email = input.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "Email is already registered".to_string(),
            });
        }

        let user = self
            .create_user(email, input.name.trim().to_string(), &input.password, Role::User)
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Authenticate user with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self.generate_tokens(&user)?;
        self.store_refresh_token(user.id, &tokens.refresh_token).await?;

        tracing::debug!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    /// Exchange a refresh token for a new token pair. The old refresh token
    /// is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let user_id = self
            .users
            .consume_refresh_token(&token_hash)
            .await?
            .ok_or(AppError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let tokens = self.generate_tokens(&user)?;
        self.store_refresh_token(user.id, &tokens.refresh_token).await?;

        Ok(tokens)
    }

    /// Create the configured admin account unless its email is taken
    pub async fn seed_admin(&self, config: &Config) -> AppResult<()> {
        let email = config.admin.email.trim().to_lowercase();
        validate_email(&email).map_err(|msg| AppError::validation("admin.email", msg))?;
        validate_password(&config.admin.password)
            .map_err(|msg| AppError::validation("admin.password", msg))?;

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::debug!("Admin account already present");
            return Ok(());
        }

        let admin = self
            .create_user(email, config.admin.name.clone(), &config.admin.password, Role::Admin)
            .await?;
        tracing::info!(user_id = %admin.id, "Seeded admin account");
        Ok(())
    }

    async fn create_user(
        &self,
        email: String,
        name: String,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        let password_hash = hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        self.users
            .create(NewUser {
                email,
                name,
                role,
                password_hash,
            })
            .await
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user: &User) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Opaque; only its hash is stored
        let refresh_token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);
        self.users
            .store_refresh_token(user_id, &Self::hash_token(token), expires_at)
            .await
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
