use anyhow::Context;

use stockroom_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockroom_observability::init(config.log_format);

    if config.jwt_secret_is_default {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let app = stockroom_api::app::build_app(&config)
        .await
        .context("failed to initialise storage")?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
