use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{Backoff, retry_with_backoff};

#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    /// The URL did not parse or the client could not be built
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The client was built but the deployment did not answer `ping`
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Build a client with the pool and timeout settings of `config`.
///
/// An unreachable deployment fails here on `ping`, not on the first request.
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!(url = %config.redacted_url(), "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.app_name = config.app_name.clone();
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    let client = Client::with_options(options)?;
    ping(&client)
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("MongoDB answered ping");
    Ok(client)
}

/// [`connect_from_config`] repeated under `backoff`, for starting next to a
/// database container that may not accept connections yet.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    backoff: Backoff,
) -> Result<Client, MongoError> {
    retry_with_backoff(backoff, || connect_from_config(config)).await
}

pub(crate) async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}
