use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    response::IntoResponse,
    Json,
};

use crate::app::dto::{self, DeleteNotificationsQuery, MarkNotificationsRequest, NotificationListQuery};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<NotificationListQuery>, QueryRejection>,
) -> axum::response::Response {
    let params = match dto::query(params) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .inventory
        .list_notifications(params.unread, params.limit)
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

/// Mark one notification, or all of them, read or unread.
pub async fn mark(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<MarkNotificationsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::body(payload) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let target = match dto::parse_notification_target(&body.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.mark_notifications(target, body.read).await {
        Ok(updated) => Json(serde_json::json!({ "success": true, "updated": updated })).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

/// Delete one notification, or with `id=all` every read one.
pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<DeleteNotificationsQuery>, QueryRejection>,
) -> axum::response::Response {
    let params = match dto::query(params) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let target = match dto::parse_notification_target(&params.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory.delete_notifications(target).await {
        Ok(deleted) => Json(serde_json::json!({ "success": true, "deleted": deleted })).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}
