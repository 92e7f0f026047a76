use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    response::IntoResponse,
    Json,
};

use crate::app::dto::{self, ActivityResponse, LimitQuery};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory.dashboard_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn inventory_chart(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory.inventory_chart().await {
        Ok(series) => Json(series).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn waste_chart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.inventory.waste_chart(principal.user_id()).await {
        Ok(series) => Json(series).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.inventory.period_summary(principal.user_id()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::service_error_to_response(e, services.inventory.texts()),
    }
}

pub async fn activity(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<LimitQuery>, QueryRejection>,
) -> axum::response::Response {
    let params = match dto::query(params) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let texts = services.inventory.texts();
    match services.inventory.recent_activity(params.limit).await {
        Ok(entries) => Json(
            entries
                .into_iter()
                .map(|entry| ActivityResponse::new(entry, texts))
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::service_error_to_response(e, texts),
    }
}
