use thiserror::Error;

/// Why a request was treated as unauthenticated.
///
/// Only used for logging: every reason maps to the same 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    MissingToken,
    InvalidToken,
    TokenExpired,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Login failed. Deliberately does not say whether the user exists.
    #[error("invalid authentication credentials")]
    InvalidCredentials,

    /// Bad signature, malformed structure or missing required claims.
    #[error("invalid token")]
    InvalidToken,

    /// Well-formed and correctly signed, but past `exp`.
    #[error("token expired")]
    TokenExpired,

    #[error("could not validate credentials")]
    Unauthenticated(UnauthenticatedReason),

    #[error("forbidden")]
    Forbidden,

    /// Username or email is already taken.
    #[error("username or email already registered")]
    AlreadyRegistered,

    /// Signing, hashing or storage failure.
    #[error("internal auth failure")]
    Internal,
}

impl AuthError {
    /// Fold token verification failures into the externally visible umbrella.
    pub fn into_unauthenticated(self) -> Self {
        match self {
            Self::InvalidToken => Self::Unauthenticated(UnauthenticatedReason::InvalidToken),
            Self::TokenExpired => Self::Unauthenticated(UnauthenticatedReason::TokenExpired),
            other => other,
        }
    }
}
