use axum::{
    routing::get,
    Router,
};

pub mod items;
pub mod movements;
pub mod notifications;
pub mod reports;
pub mod settings;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/system/config", get(system::client_config))
        .nest("/inventory", items::router())
        .route(
            "/stock-movements",
            get(movements::list_movements).post(movements::submit_movement),
        )
        .route(
            "/notifications",
            get(notifications::list)
                .patch(notifications::mark)
                .delete(notifications::delete),
        )
        .route("/activity", get(reports::activity))
        .route("/stats", get(reports::stats))
        .route("/charts/inventory", get(reports::inventory_chart))
        .route("/charts/waste", get(reports::waste_chart))
        .route("/reports/summary", get(reports::summary))
        .route("/settings", get(settings::get_settings).patch(settings::update_settings))
}
