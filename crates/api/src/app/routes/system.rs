use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal_id": principal.principal_id().to_string(),
        "user_id": principal.user_id().to_string(),
    }))
}

/// Presentation settings the client needs before rendering anything.
pub async fn client_config(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "locale": services.locale.code(),
        "currency": services.currency,
        "notification_poll_seconds": services.notification_poll_seconds,
        "default_thresholds": services.default_thresholds,
    }))
}
