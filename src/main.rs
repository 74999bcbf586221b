use dotenvy::dotenv;
use gatekeep::router::init_router;
use gatekeep::state::init_app_state;
use gatekeep_config::ServerConfig;
use gatekeep_observability::{init_metrics, init_tracing, metrics_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing();
    let metrics_handle = init_metrics()?;

    let state = init_app_state().await?;
    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(address = %address, "Server running");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await?;
    Ok(())
}
