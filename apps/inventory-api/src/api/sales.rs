//! Sales API routes

use axum::Router;
use domain_products::MongoProductRepository;
use domain_sales::{handlers, MongoSaleRepository, SaleService};
use std::sync::Arc;

use crate::state::AppState;

/// Create sales router
pub fn router(state: &AppState, products: Arc<MongoProductRepository>) -> Router {
    let sales = Arc::new(MongoSaleRepository::new(&state.db));
    handlers::router(SaleService::new(products, sales))
}

/// Initialize sales indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let repository = MongoSaleRepository::new(&state.db);
    repository.init_indexes().await?;
    Ok(())
}
