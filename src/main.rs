use anyhow::Context;
use dotenvy::dotenv;

use control_escolar::logging::init_tracing;
use control_escolar::router::init_router;
use control_escolar::state::AppState;
use control_escolar_config::ServerConfig;
use control_escolar_db::init_db_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing().context("Failed to create logs directory")?;

    let db = init_db_pool().await?;
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    let state = AppState::new(db);
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(address = %address, "Server running");
    tracing::info!("Swagger UI available at /swagger-ui, Scalar UI at /scalar");

    axum::serve(listener, app).await?;

    Ok(())
}
