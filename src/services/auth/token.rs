use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::services::auth::error::AuthError;
use crate::services::auth::principal::Principal;

/// Access token claims.
///
/// `sub`, `id` and `exp` are required. Role flags default to `false` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_supplier: bool,
    #[serde(default)]
    pub is_customer: bool,
    /// Unix timestamp (seconds, UTC).
    pub exp: i64,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal {
            username: self.sub.clone(),
            id: self.id,
            is_admin: self.is_admin,
            is_supplier: self.is_supplier,
            is_customer: self.is_customer,
        }
    }
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Stateless: the secret and algorithm are fixed at construction and each call
/// only depends on its inputs and the clock.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl TokenService {
    /// `algorithm` must be one of HS256 / HS384 / HS512.
    pub fn new(secret: &str, algorithm: Algorithm) -> Result<Self, AuthError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            warn!(?algorithm, "token signing needs an HMAC algorithm");
            return Err(AuthError::Internal);
        }
        if secret.is_empty() {
            warn!("token signing secret is empty");
            return Err(AuthError::Internal);
        }

        // Expiry is checked here rather than by jsonwebtoken, so an expired token
        // can be told apart from a malformed one.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string()]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, principal: &Principal, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(principal, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        principal: &Principal,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            error!(ttl_seconds = ttl.num_seconds(), "token expiry out of range");
            AuthError::Internal
        })?;

        let claims = Claims {
            sub: principal.username.clone(),
            id: principal.id,
            is_admin: principal.is_admin,
            is_supplier: principal.is_supplier,
            is_customer: principal.is_customer,
            exp: exp.timestamp(),
        };

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign access token");
            AuthError::Internal
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and structure, then expiry against `now`.
    ///
    /// - signature, structure or required-claim failures: `InvalidToken`
    /// - `exp < now`: `TokenExpired`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })?;

        let claims = data.claims;
        if claims.exp < now.timestamp() {
            debug!(sub = %claims.sub, exp = claims.exp, "token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
