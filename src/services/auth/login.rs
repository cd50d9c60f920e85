use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};

use crate::repos::error::RepoError;
use crate::repos::user_repo::{NewUser, UserStore};
use crate::services::auth::error::AuthError;
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::principal::Principal;
use crate::services::auth::token::TokenService;

/// What a successful login hands back to the client.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Registration input after DTO validation; the password is still plaintext.
#[derive(Clone, Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Credential checks and token issuance for `/auth`.
///
/// Password hashing is CPU-heavy, so it runs on the blocking pool; concurrent
/// logins never queue behind one another on the async workers.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    ttl: Duration,
    // Checked when the username is unknown so both failure paths cost one verify.
    dummy_digest: Arc<str>,
}

impl LoginService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        ttl: Duration,
    ) -> Result<Self, AuthError> {
        let dummy_digest = hasher
            .hash("not-a-real-password")
            .map_err(|_| AuthError::Internal)?;

        Ok(Self {
            users,
            tokens,
            hasher,
            ttl,
            dummy_digest: dummy_digest.into(),
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.num_seconds().max(0) as u64
    }

    /// Unknown user, wrong password and inactive user are all `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self
            .users
            .find_user_by_username(username)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up user for login");
                AuthError::Internal
            })?;

        let digest = match &user {
            Some(u) => u.hashed_password.clone(),
            None => self.dummy_digest.to_string(),
        };
        let password_ok = self.verify_blocking(password, digest).await?;

        let user = match user {
            Some(u) if password_ok && u.is_active => u,
            _ => {
                warn!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let principal = Principal {
            username: user.username,
            id: user.id,
            is_admin: user.is_admin,
            is_supplier: user.is_supplier,
            is_customer: user.is_customer,
        };
        let access_token = self.tokens.issue(&principal, self.ttl)?;

        info!(user_id = principal.id, "access token issued");

        Ok(IssuedToken {
            access_token,
            token_type: "bearer",
            expires_in: self.ttl_seconds(),
        })
    }

    /// Create a customer account. Returns the new user id.
    pub async fn register(&self, reg: Registration) -> Result<i64, AuthError> {
        let hasher = self.hasher.clone();
        let password = reg.password;
        let hashed_password = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing task failed");
                AuthError::Internal
            })?
            .map_err(|_| AuthError::Internal)?;

        let id = self
            .users
            .insert_user(NewUser {
                first_name: reg.first_name,
                last_name: reg.last_name,
                username: reg.username,
                email: reg.email,
                hashed_password,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AuthError::AlreadyRegistered,
                other => {
                    error!(error = %other, "failed to insert user");
                    AuthError::Internal
                }
            })?;

        info!(user_id = id, "user registered");
        Ok(id)
    }

    async fn verify_blocking(&self, password: &str, digest: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| {
                error!(error = %e, "password verification task failed");
                AuthError::Internal
            })
    }
}
