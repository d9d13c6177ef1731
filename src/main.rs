use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mygram::config::AppConfig;
use mygram::database::{ensure_schema, DatabaseManager, PgStore};
use mygram::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DATABASE_* and SECRET_KEY
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_filter))
        .init();
    info!("Starting MyGram API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    ensure_schema(&pool).await.context("failed to prepare schema")?;

    let state = AppState::from_config(Arc::new(PgStore::new(pool)), &config);
    let router = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    if config.security.require_https {
        let tls = RustlsConfig::from_pem_file(&config.server.tls_cert_path, &config.server.tls_key_path)
            .await
            .with_context(|| {
                format!(
                    "failed to load TLS pair {} / {}",
                    config.server.tls_cert_path.display(),
                    config.server.tls_key_path.display()
                )
            })?;

        info!("MyGram API listening on https://{}", addr);
        axum_server::bind_rustls(addr, tls)
            .serve(router.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        info!("MyGram API listening on http://{}", addr);
        axum::serve(listener, router).await?;
    }

    Ok(())
}
