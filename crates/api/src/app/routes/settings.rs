use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::IntoResponse,
    Json,
};

use stockroom_inventory::ThresholdsPatch;

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn get_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.inventory.settings(principal.user_id()).await {
        Ok(thresholds) => Json(thresholds).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

/// Partial update; omitted thresholds keep their current value.
pub async fn update_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<ThresholdsPatch>, JsonRejection>,
) -> axum::response::Response {
    let patch = match dto::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.update_settings(principal.user_id(), &patch).await {
        Ok(thresholds) => Json(thresholds).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}
