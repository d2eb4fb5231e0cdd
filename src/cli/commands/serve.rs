use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::{initialize_app_state, Settings};
use crate::router::create_router;

/// Connects the table source and binds the listener without serving yet.
pub async fn prepare(settings: Settings) -> Result<(TcpListener, Router)> {
    let bind_address = settings.bind_address.clone();
    debug!("Table {} via {}", settings.table, bind_address);

    let state = initialize_app_state(settings)
        .await
        .context("failed to initialize application state")?;
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    Ok((listener, create_router(state)))
}

pub async fn serve(settings: Settings) -> Result<()> {
    let (listener, app) = prepare(settings).await?;
    let address = listener.local_addr()?;

    info!("Dashboard running on http://{}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);

    axum::serve(listener, app).await.context("server error")?;
    info!("Server stopped");
    Ok(())
}
