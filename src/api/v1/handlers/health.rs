/*
 * Responsibility
 * - GET /health (liveness) and GET / (welcome)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

pub async fn welcome() -> impl IntoResponse {
    Json(json!({"message": "My shop"}))
}
