use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_core::ItemId;
use stockroom_infra::services::{ItemOutcome, ItemQuery};
use stockroom_inventory::ItemInput;

use crate::app::dto::{self, ItemListQuery, ItemResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<ItemListQuery>, QueryRejection>,
) -> axum::response::Response {
    let params = match dto::query(params) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let query = match (
        dto::parse_category(params.category.as_deref()),
        dto::parse_status(params.status.as_deref()),
    ) {
        (Ok(category), Ok(status)) => ItemQuery {
            search: params.search,
            category,
            status,
        },
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    let texts = services.inventory.texts();
    match services.inventory.list_items(&query).await {
        Ok(items) => Json(
            items
                .into_iter()
                .map(|item| ItemResponse::new(item, texts))
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::service_error_to_response(e, texts),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match dto::parse_id(Some(&id), "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let texts = services.inventory.texts();
    match services.inventory.get_item(id).await {
        Ok(item) => Json(ItemResponse::new(item, texts)).into_response(),
        Err(e) => errors::service_error_to_response(e, texts),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> axum::response::Response {
    let input = match dto::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.create_item(&input).await {
        Ok(outcome) => (StatusCode::CREATED, item_outcome(outcome, &services)).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> axum::response::Response {
    let id: ItemId = match dto::parse_id(Some(&id), "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let input = match dto::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.update_item(id, &input).await {
        Ok(outcome) => item_outcome(outcome, &services).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ItemId = match dto::parse_id(Some(&id), "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.delete_item(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

fn item_outcome(outcome: ItemOutcome, services: &AppServices) -> Json<serde_json::Value> {
    let texts = services.inventory.texts();
    Json(serde_json::json!({
        "item": ItemResponse::new(outcome.item, texts),
        "warnings": errors::field_list(&outcome.warnings, texts),
    }))
}
