//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductService};
use std::sync::Arc;

/// Create products router
pub fn router(repository: Arc<MongoProductRepository>) -> Router {
    handlers::router(ProductService::from_shared(repository))
}
