/*
 * Responsibility
 * - /auth request/response DTOs
 * - validate() does shape checks only; uniqueness is the store's job
 */
use serde::{Deserialize, Serialize};

/// `application/x-www-form-urlencoded` body of `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("first_name and last_name are required");
        }
        let username = self.username.trim();
        if username.is_empty() {
            return Err("username is required");
        }
        if username.len() > 64 {
            return Err("username must be <= 64 chars");
        }
        if username.chars().any(char::is_whitespace) {
            return Err("username must not contain whitespace");
        }
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err("email is invalid"),
        }
        if self.password.chars().count() < 8 {
            return Err("password must be at least 8 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub id: i64,
    pub username: String,
}
