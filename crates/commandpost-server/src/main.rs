use commandpost_server::{ServerConfig, build_app, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env for local development; absence is fine.
    let _ = dotenvy::dotenv();

    let cfg = ServerConfig::load(Some("commandpost"))?;
    observability::init_tracing(&cfg.log_level);

    let app = build_app();
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr()).await?;
    tracing::info!(addr = %cfg.bind_addr(), "commandpost server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutting down");
}
