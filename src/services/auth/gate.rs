/*
 * Responsibility
 * - Authorization header -> verified Principal
 * - Role checks against a Principal (no knowledge of resource ownership)
 */
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::services::auth::error::{AuthError, UnauthenticatedReason};
use crate::services::auth::principal::{Principal, Role};
use crate::services::auth::token::TokenService;

#[derive(Clone, Debug)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub fn authenticate(&self, raw_header: Option<&str>) -> Result<Principal, AuthError> {
        self.authenticate_at(raw_header, Utc::now())
    }

    /// NoToken -> TokenPresent -> Verified | Rejected.
    ///
    /// Every rejection is `Unauthenticated`; the reason is kept for logging only.
    pub fn authenticate_at(
        &self,
        raw_header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let token = raw_header
            .and_then(bearer_token)
            .ok_or(AuthError::Unauthenticated(UnauthenticatedReason::MissingToken))?;

        self.tokens
            .verify_at(token, now)
            .map(|claims| claims.principal())
            .map_err(AuthError::into_unauthenticated)
    }
}

/// `Bearer <token>`; the scheme is matched case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// True iff the principal holds at least one of `required`.
pub fn authorize(principal: &Principal, required: &[Role]) -> bool {
    required.iter().any(|role| principal.has_role(*role))
}

/// Like [`authorize`], but also passes when the caller's ownership check does.
///
/// `owns` is only evaluated when the role check fails.
pub fn authorize_or_owner(
    principal: &Principal,
    required: &[Role],
    owns: impl FnOnce(&Principal) -> bool,
) -> bool {
    authorize(principal, required) || owns(principal)
}

pub fn require(principal: &Principal, required: &[Role]) -> Result<(), AuthError> {
    if authorize(principal, required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn gate() -> (AuthGate, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new("gate-test-secret", Algorithm::HS256).unwrap());
        (AuthGate::new(tokens.clone()), tokens)
    }

    fn principal(is_admin: bool, is_supplier: bool, is_customer: bool) -> Principal {
        Principal {
            username: "user".into(),
            id: 42,
            is_admin,
            is_supplier,
            is_customer,
        }
    }

    #[test]
    fn missing_or_foreign_header_is_missing_token() {
        let (gate, _) = gate();
        let missing = Err(AuthError::Unauthenticated(UnauthenticatedReason::MissingToken));

        assert_eq!(gate.authenticate(None), missing);
        assert_eq!(gate.authenticate(Some("")), missing);
        assert_eq!(gate.authenticate(Some("Bearer")), missing);
        assert_eq!(gate.authenticate(Some("Bearer   ")), missing);
        assert_eq!(gate.authenticate(Some("Basic dXNlcjpwYXNz")), missing);
    }

    #[test]
    fn valid_token_yields_principal() {
        let (gate, tokens) = gate();
        let p = principal(false, true, false);
        let token = tokens.issue(&p, Duration::minutes(20)).unwrap();

        assert_eq!(gate.authenticate(Some(&format!("Bearer {token}"))), Ok(p.clone()));
        assert_eq!(gate.authenticate(Some(&format!("bearer {token}"))), Ok(p));
    }

    #[test]
    fn verify_failures_become_unauthenticated() {
        let (gate, tokens) = gate();
        let now = Utc::now();
        let token = tokens
            .issue_at(&principal(true, false, false), Duration::minutes(20), now)
            .unwrap();
        let header = format!("Bearer {token}");

        assert_eq!(
            gate.authenticate_at(Some(&header), now + Duration::minutes(21)),
            Err(AuthError::Unauthenticated(UnauthenticatedReason::TokenExpired))
        );
        assert_eq!(
            gate.authenticate(Some("Bearer not.a.token")),
            Err(AuthError::Unauthenticated(UnauthenticatedReason::InvalidToken))
        );
    }

    #[test]
    fn authorize_checks_role_intersection() {
        let supplier = principal(false, true, false);
        let admin = principal(true, false, false);

        assert!(!authorize(&supplier, &[Role::Admin]));
        assert!(authorize(&admin, &[Role::Admin]));
        assert!(authorize(&supplier, &[Role::Admin, Role::Supplier]));
        assert!(!authorize(&admin, &[]));
    }

    #[test]
    fn ownership_predicate_is_an_alternative() {
        let supplier = principal(false, true, false);
        let owner_id = 42;

        assert!(authorize_or_owner(&supplier, &[Role::Admin], |p| {
            p.is_supplier && p.id == owner_id
        }));
        assert!(!authorize_or_owner(&supplier, &[Role::Admin], |p| {
            p.is_supplier && p.id == 99
        }));
    }

    #[test]
    fn require_maps_to_forbidden() {
        let customer = principal(false, false, true);

        assert_eq!(require(&customer, &[Role::Customer]), Ok(()));
        assert_eq!(require(&customer, &[Role::Admin]), Err(AuthError::Forbidden));
    }
}
