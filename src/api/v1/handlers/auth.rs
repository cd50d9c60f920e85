/*
 * Responsibility
 * - /auth handlers: token issuance, current principal, registration
 * - Credential and token checks live in services::auth; these only adapt HTTP
 */
use axum::{Form, Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{CreateUserRequest, LoginForm, TokenResponse, UserCreatedResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    services::auth::{Principal, Registration},
    state::AppState,
};

pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.login.login(&form.username, &form.password).await?;

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}

pub async fn read_current_user(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let username = req.username.trim().to_string();
    let id = state
        .login
        .register(Registration {
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            username: username.clone(),
            email: req.email.trim().to_string(),
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserCreatedResponse { id, username })))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::api::v1::routes;
    use crate::repos::user_repo::UserRow;
    use crate::services::auth::PasswordHasher;
    use crate::state::testing::{bearer, principal, state_with_users};

    fn alice() -> UserRow {
        UserRow {
            id: 1,
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            hashed_password: PasswordHasher::new().hash("s3cret-pass").unwrap(),
            is_active: true,
            is_admin: false,
            is_supplier: true,
            is_customer: false,
        }
    }

    async fn json_body(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn login_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn token_then_read_current_user() {
        let (state, _) = state_with_users(vec![alice()]);
        let app = routes(state.clone()).with_state(state);

        let res = app
            .clone()
            .oneshot(login_request("username=alice&password=s3cret-pass"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        assert_eq!(body["token_type"], "bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/auth/read_current_user")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["id"], 1);
        assert_eq!(body["is_supplier"], true);
        assert_eq!(body["is_admin"], false);
    }

    #[tokio::test]
    async fn wrong_password_is_401_with_challenge() {
        let (state, _) = state_with_users(vec![alice()]);
        let app = routes(state.clone()).with_state(state);

        let res = app
            .oneshot(login_request("username=alice&password=wrong"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn read_current_user_requires_a_valid_token() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);

        for auth in [None, Some("Bearer garbage"), Some("Basic YWxpY2U6cHc=")] {
            let mut req = Request::builder().uri("/auth/read_current_user");
            if let Some(value) = auth {
                req = req.header(header::AUTHORIZATION, value);
            }

            let res = app
                .clone()
                .oneshot(req.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{auth:?}");
        }
    }

    #[tokio::test]
    async fn role_flags_come_back_from_the_token() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let p = principal(9, true, false, false);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/auth/read_current_user")
                    .header(header::AUTHORIZATION, bearer(&p))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["id"], 9);
        assert_eq!(body["is_admin"], true);
    }

    fn register_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn register_creates_a_customer() {
        let (state, store) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);

        let res = app
            .oneshot(register_request(serde_json::json!({
                "first_name": "Bob",
                "last_name": "Builder",
                "username": "bob",
                "email": "bob@example.com",
                "password": "can-we-fix-it",
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let body = json_body(res).await;
        let id = body["id"].as_i64().unwrap();
        let row = store.get(id).unwrap();
        assert_eq!(row.username, "bob");
        assert!(row.is_customer);
    }

    #[tokio::test]
    async fn register_rejects_invalid_and_duplicate_users() {
        let (state, _) = state_with_users(vec![alice()]);
        let app = routes(state.clone()).with_state(state);

        let res = app
            .clone()
            .oneshot(register_request(serde_json::json!({
                "first_name": "Eve",
                "last_name": "Short",
                "username": "eve",
                "email": "eve@example.com",
                "password": "short",
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(register_request(serde_json::json!({
                "first_name": "Alice",
                "last_name": "Again",
                "username": "alice",
                "email": "alice2@example.com",
                "password": "long-enough",
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
