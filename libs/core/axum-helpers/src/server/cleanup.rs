//! Connection cleanup run during graceful shutdown.

use tracing::info;

/// Shut down a MongoDB client, waiting for in-use connections to be returned.
///
/// ```ignore
/// let cleanup = close_mongo(state.mongo_client.clone(), "primary");
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn close_mongo(client: mongodb::Client, name: &str) {
    client.shutdown().await;
    info!("MongoDB client '{}' closed", name);
}
