//! In-process auth backend for demo mode and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::AuthBackend;
use erp_core::types::{Session, SessionUser, UserId};

use crate::jwt::{JwtDecoder, JwtEncoder};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    /// refresh token -> e-mail
    refresh_tokens: HashMap<String, String>,
    revoked: Vec<String>,
    magic_links: Vec<String>,
}

/// [`AuthBackend`] keeping accounts in memory and signing real JWTs.
#[derive(Debug)]
pub struct MemoryAuthBackend {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    state: RwLock<State>,
}

impl MemoryAuthBackend {
    /// Create a backend signing tokens with `secret`, valid for `ttl`.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoder: JwtEncoder::new(secret, ttl),
            decoder: JwtDecoder::new(secret, 0),
            state: RwLock::new(State::default()),
        }
    }

    /// Register an account and return its user ID.
    pub async fn add_user(&self, email: &str, password: &str) -> UserId {
        let id = UserId::from_uuid(Uuid::new_v4());
        self.state.write().await.accounts.insert(
            email.to_lowercase(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        id
    }

    /// Addresses magic links were requested for, oldest first.
    pub async fn magic_links(&self) -> Vec<String> {
        self.state.read().await.magic_links.clone()
    }

    fn issue(&self, state: &mut State, email: &str, account: &Account) -> AppResult<Session> {
        let (access_token, expires_at) = self.encoder.access_token(account.id, Some(email))?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        state
            .refresh_tokens
            .insert(refresh_token.clone(), email.to_string());
        Ok(Session {
            access_token,
            refresh_token,
            expires_at: Some(expires_at),
            user: SessionUser {
                id: account.id,
                email: Some(email.to_string()),
            },
        })
    }
}

#[async_trait]
impl AuthBackend for MemoryAuthBackend {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim().to_lowercase();
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get(&email)
            .filter(|a| a.password == password)
            .cloned()
            .ok_or_else(|| AppError::authentication("Invalid login credentials"))?;
        self.issue(&mut state, &email, &account)
    }

    async fn sign_in_with_otp(&self, email: &str, _redirect_to: Option<&str>) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::validation("E-mail is required"));
        }
        info!(email = %email, "Magic link recorded");
        self.state.write().await.magic_links.push(email);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> AppResult<SessionUser> {
        if self
            .state
            .read()
            .await
            .revoked
            .iter()
            .any(|t| t == access_token)
        {
            return Err(AppError::authentication("Session has been revoked"));
        }
        self.decoder.decode_user(access_token)
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<Session> {
        let mut state = self.state.write().await;
        let email = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::authentication("Invalid refresh token"))?;
        let account = state
            .accounts
            .get(&email)
            .cloned()
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;
        self.issue(&mut state, &email, &account)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let user = self.decoder.decode_user(access_token)?;
        let mut state = self.state.write().await;
        state.revoked.push(access_token.to_string());
        if let Some(email) = user.email {
            state.refresh_tokens.retain(|_, owner| *owner != email);
        }
        Ok(())
    }
}
