use anyhow::Context;

use pharmanet_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    pharmanet_observability::init(config.log_format);

    let app = pharmanet_api::app::build_app(&config).await;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        channel = %config.channel,
        chaincode = %config.chaincode,
        "PharmaNet API listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
