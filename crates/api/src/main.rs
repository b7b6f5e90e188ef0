use std::sync::Arc;

use anyhow::Context;

use stockroom_api::app::{self, services::AppServices};
use stockroom_api::config::ApiConfig;

#[tokio::main]
async fn main() {
    stockroom_observability::init();

    // Startup failures are fatal: nothing is served without a working store.
    if let Err(err) = run().await {
        tracing::error!(error = %format!("{err:#}"), "startup failed");
        eprintln!("stockroom: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("configuration error")?;

    let store = app::services::connect_store(&config.store)
        .await
        .context("configuration error: cannot reach the data store (check DATABASE_URL)")?;

    let services = Arc::new(AppServices::new(store, config.currency.clone()));
    services
        .ensure_reachable()
        .await
        .context("configuration error: data store did not answer")?;

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
