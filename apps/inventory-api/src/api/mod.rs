//! API routes module

pub mod health;
pub mod products;
pub mod sales;

use axum::Router;
use domain_products::MongoProductRepository;
use std::sync::Arc;

use crate::state::AppState;

/// Create all API routes
///
/// Products and sales share one product repository so every stock change
/// goes through the same collection handle.
pub fn routes(state: &AppState) -> Router {
    let products = Arc::new(MongoProductRepository::new(&state.db));

    Router::new()
        .nest("/product", products::router(Arc::clone(&products)))
        .nest("/sale", sales::router(state, products))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    sales::init_indexes(state).await
}
