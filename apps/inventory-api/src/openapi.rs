//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Inventory API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Phone inventory and point-of-sale API",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/product", api = domain_products::ApiDoc),
        (path = "/sale", api = domain_sales::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog and stock"),
        (name = "Sales", description = "Sales that draw down product stock")
    )
)]
pub struct ApiDoc;
