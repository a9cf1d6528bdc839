//! Root and readiness endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture, MessageResponse};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::AppState;

async fn root() -> MessageResponse {
    MessageResponse::new("App is running!")
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = check_health_detailed(&state.mongo_client).await;
            match (status.healthy, status.message) {
                (true, _) => Ok(()),
                (false, message) => Err(message.unwrap_or_else(|| "ping failed".to_string())),
            }
        }),
    )];
    run_health_checks(checks).await
}

/// `/` and `/ready`; `/health` comes from `axum_helpers::health_router`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ready", get(ready))
        .with_state(state)
}
