//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store connection and the shared `AppServices`
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use stockroom_infra::store::StoreError;
use stockroom_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let services = services::build_services(config).await?;
    Ok(router_with_services(config, services))
}

fn router_with_services(config: &AppConfig, services: services::AppServices) -> Router {
    let jwt = Arc::new(stockroom_auth::Hs256JwtValidator::new(
        config.jwt_secret.clone().into_bytes(),
    ));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
