//! Inventory API - products and stock-consistent sales over MongoDB

use axum_helpers::server::{close_mongo, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::{Backoff, mongodb::connect_from_config_with_retry};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(url = %config.mongodb.redacted_url(), "Connecting to MongoDB");

    let mongo_client =
        connect_from_config_with_retry(&config.mongodb, Backoff::default()).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        database = config.mongodb.database(),
        "Successfully connected to MongoDB"
    );

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    api::init_indexes(&state).await?;

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app));

    info!(
        port = state.config.server.port,
        environment = ?state.config.environment,
        "Starting Inventory API"
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        close_mongo(state.mongo_client.clone(), "primary"),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Inventory API shutdown complete");
    Ok(())
}
