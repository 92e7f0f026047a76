use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    response::IntoResponse,
    Json,
};

use stockroom_core::ItemId;

use crate::app::dto::{self, ItemResponse, MovementListQuery, SubmitMovementRequest};
use crate::app::errors;
use crate::app::services::AppServices;

/// Apply one stock movement to an item.
///
/// Responds with the new quantity, the recorded movement and any alerts it raised.
pub async fn submit_movement(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<SubmitMovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let (item_id, request) = match dto::body(payload).and_then(SubmitMovementRequest::into_parts) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let texts = services.inventory.texts();
    match services.inventory.apply_movement(item_id, &request).await {
        Ok(outcome) => Json(serde_json::json!({
            "success": true,
            "new_quantity": outcome.new_quantity(),
            "item": ItemResponse::new(outcome.item, texts),
            "movement": outcome.movement,
            "notifications": outcome.notifications,
        }))
        .into_response(),
        Err(e) => errors::service_error_to_response(e, texts),
    }
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<MovementListQuery>, QueryRejection>,
) -> axum::response::Response {
    let params = match dto::query(params) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id = match dto::parse_optional_id::<ItemId>(params.item_id.as_deref(), "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let kind = match dto::parse_kind(params.kind.as_deref()) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.list_movements(item_id, kind, params.limit).await {
        Ok(movements) => Json(movements).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}
