//! HTTP handlers for Sales API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_helpers::{
    ApiResponse, ValidatedJson,
    errors::responses::{
        BadRequestInvalidIdResponse, BadRequestValidationResponse, ConflictResponse,
        InsufficientStockResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse,
    },
};
use domain_products::ProductRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SaleResult;
use crate::models::{SaleRequest, SaleResponse};
use crate::repository::SaleRepository;
use crate::service::SaleService;

/// OpenAPI documentation for Sales API
#[derive(OpenApi)]
#[openapi(
    paths(list_sales, create_sale, get_sale, update_sale),
    components(
        schemas(SaleRequest, SaleResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestInvalidIdResponse,
            InsufficientStockResponse,
            ConflictResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Sales", description = "Sales that draw down product stock")
    )
)]
pub struct ApiDoc;

type SharedService<P, S> = Arc<SaleService<P, S>>;

/// Create the sales router; mount it under `/sale`.
pub fn router<P, S>(service: SaleService<P, S>) -> Router
where
    P: ProductRepository + 'static,
    S: SaleRepository + 'static,
{
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/{id}", get(get_sale).put(update_sale))
        .with_state(Arc::new(service))
}

/// List all sales
#[utoipa::path(
    get,
    path = "",
    tag = "Sales",
    responses(
        (status = 200, description = "All sales", body = ApiResponse<Vec<SaleResponse>>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_sales<P: ProductRepository, S: SaleRepository>(
    State(service): State<SharedService<P, S>>,
) -> SaleResult<Json<ApiResponse<Vec<SaleResponse>>>> {
    let sales = service.list_sales().await?;
    let data = sales.into_iter().map(SaleResponse::from).collect();
    Ok(Json(ApiResponse::new("Sales retrieved", data)))
}

/// Record a sale and take its quantity out of stock
#[utoipa::path(
    post,
    path = "",
    tag = "Sales",
    request_body = SaleRequest,
    responses(
        (status = 201, description = "Sale created", body = ApiResponse<SaleResponse>),
        (status = 400, response = InsufficientStockResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_sale<P: ProductRepository, S: SaleRepository>(
    State(service): State<SharedService<P, S>>,
    ValidatedJson(request): ValidatedJson<SaleRequest>,
) -> SaleResult<(StatusCode, Json<ApiResponse<SaleResponse>>)> {
    let sale = service.create_sale(request).await?;
    Ok(ApiResponse::created("Sale created", sale.into()))
}

/// Get a sale by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Sales",
    params(("id" = String, Path, description = "Sale ObjectId (24 hex characters)")),
    responses(
        (status = 200, description = "Sale found", body = ApiResponse<SaleResponse>),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_sale<P: ProductRepository, S: SaleRepository>(
    State(service): State<SharedService<P, S>>,
    Path(id): Path<String>,
) -> SaleResult<Json<ApiResponse<SaleResponse>>> {
    let sale = service.get_sale(&id).await?;
    Ok(Json(ApiResponse::new("Sale retrieved", sale.into())))
}

/// Change the product and/or quantity of a sale
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Sales",
    params(("id" = String, Path, description = "Sale ObjectId (24 hex characters)")),
    request_body = SaleRequest,
    responses(
        (status = 200, description = "Sale updated", body = ApiResponse<SaleResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_sale<P: ProductRepository, S: SaleRepository>(
    State(service): State<SharedService<P, S>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<SaleRequest>,
) -> SaleResult<Json<ApiResponse<SaleResponse>>> {
    let sale = service.update_sale(&id, request).await?;
    Ok(Json(ApiResponse::new("Sale updated", sale.into())))
}
