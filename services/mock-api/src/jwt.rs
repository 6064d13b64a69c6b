//! JWT service for token generation, validation, and management
//!
//! Tokens are signed with HS256 using a shared secret. Used refresh tokens
//! are revoked on rotation, and two generation counters let the whole
//! token population be invalidated at once: bumping the access generation
//! forces every client through the refresh flow, bumping the refresh
//! generation ends every session.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use common::models::User;

const DEV_SECRET: &str = "mock-api-development-secret";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (default: a fixed development secret)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string());

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        JwtConfig {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }
}

/// Token failures
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Expected a {0:?} token")]
    WrongType(TokenType),

    #[error("Token has been revoked")]
    Revoked,

    #[error("Failed to get current time")]
    Clock,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Unique token ID
    pub jti: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Generation the token was issued in
    pub generation: u64,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
    access_generation: Arc<AtomicU64>,
    refresh_generation: Arc<AtomicU64>,
    /// Revoked refresh token ids and their expiry
    revoked: Arc<RwLock<HashMap<String, u64>>>,
}

fn now() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::Clock)?
        .as_secs())
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
            access_generation: Arc::new(AtomicU64::new(0)),
            refresh_generation: Arc::new(AtomicU64::new(0)),
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn issue(&self, user: &User, token_type: TokenType) -> Result<String, JwtError> {
        let now = now()?;
        let (expiry, generation) = match token_type {
            TokenType::Access => (
                self.config.access_token_expiry,
                self.access_generation.load(Ordering::SeqCst),
            ),
            TokenType::Refresh => (
                self.config.refresh_token_expiry,
                self.refresh_generation.load(Ordering::SeqCst),
            ),
        };

        let claims = Claims {
            sub: user.user_id.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + expiry,
            token_type,
            generation,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String, JwtError> {
        self.issue(user, TokenType::Access)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user: &User) -> Result<String, JwtError> {
        self.issue(user, TokenType::Refresh)
    }

    /// Validate a token of the expected type and return the claims
    pub async fn validate_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.token_type != expected {
            return Err(JwtError::WrongType(expected));
        }

        let current_generation = match expected {
            TokenType::Access => self.access_generation.load(Ordering::SeqCst),
            TokenType::Refresh => self.refresh_generation.load(Ordering::SeqCst),
        };
        if claims.generation < current_generation {
            return Err(JwtError::Revoked);
        }

        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(JwtError::Revoked);
        }

        Ok(claims)
    }

    /// Rotate a refresh token
    ///
    /// Revokes the old refresh token and generates a new one. The revocation
    /// check and insert happen under one lock, so a token rotates at most once.
    pub async fn rotate_refresh_token(
        &self,
        user: &User,
        old_claims: &Claims,
    ) -> Result<String, JwtError> {
        if old_claims.sub != user.user_id {
            return Err(JwtError::Revoked);
        }

        let now = now()?;
        {
            let mut revoked = self.revoked.write().await;
            if revoked.contains_key(&old_claims.jti) {
                return Err(JwtError::Revoked);
            }
            // expired tokens fail signature validation anyway
            revoked.retain(|_, exp| *exp > now);
            revoked.insert(old_claims.jti.clone(), old_claims.exp);
        }
        self.generate_refresh_token(user)
    }

    /// Invalidate every access token issued so far
    pub fn expire_access_tokens(&self) {
        let generation = self.access_generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Access tokens expired, generation is now {}", generation);
    }

    /// Invalidate every refresh token issued so far
    pub fn revoke_refresh_tokens(&self) {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Refresh tokens revoked, generation is now {}", generation);
    }
}
