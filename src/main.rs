use anyhow::Context;
use coursekit::logging::{init_tracing, shutdown_tracer};
use coursekit::metrics::{init_metrics, metrics_app};
use coursekit::router::init_router;
use coursekit::state::init_app_state;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing()?;
    let metrics_handle = init_metrics()?;

    let state = init_app_state().await?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("Failed to run database migrations")?;

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!("🚀 Server running on http://{}", bind_address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", bind_address);
    info!("📖 Scalar UI available at http://{}/scalar", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
