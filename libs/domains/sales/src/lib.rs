//! Sales Domain
//!
//! Records sales against the product catalog. Creating or updating a sale
//! moves stock in the products domain; the two stay consistent even when
//! requests race or a write fails halfway.
//!
//! A sale update resolves everything it needs (the sale, the old product and
//! the new product) before the first write. Stock changes are journaled and
//! undone in reverse if a later step fails.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::MongoProductRepository;
//! use domain_sales::{handlers, MongoSaleRepository, SaleService};
//!
//! # async fn example(db: mongodb::Database) -> Result<(), domain_sales::SaleError> {
//! let products = Arc::new(MongoProductRepository::new(&db));
//! let sales = MongoSaleRepository::new(&db);
//! sales.init_indexes().await?;
//!
//! let service = SaleService::new(products, Arc::new(sales));
//! let router = axum::Router::new().nest("/sale", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
mod journal;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{SaleError, SaleResult};
pub use handlers::ApiDoc;
pub use models::{NewSale, Sale, SaleRequest, SaleResponse};
pub use mongodb::MongoSaleRepository;
pub use repository::{InMemorySaleRepository, SaleRepository};
pub use service::SaleService;
