//! Product catalog routes.
//!
//! - `GET /v1/products`                 — list the full catalog
//! - `GET /v1/products/{id}`            — fetch one product by id
//! - `GET /v1/products/{id}/decrement`  — consume one unit of inventory
//!
//! Handlers call exactly one store operation each and translate the store's
//! error taxonomy to the boundary: `NotFound` → 404, `InsufficientInventory`
//! → 400, anything store-internal → 500.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use catalog_core::domain::product::{Product, ProductId};
use catalog_db::{CatalogError, CatalogStore};

#[derive(Clone)]
pub struct ProductsState {
    store: Arc<dyn CatalogStore>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub msg: String,
    pub error: String,
}

pub fn router(store: Arc<dyn CatalogStore>) -> Router {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/{id}", get(get_product_by_id))
        .route("/v1/products/{id}/decrement", get(decrement_product_quantity))
        .with_state(ProductsState { store })
}

fn reply_error(
    status: StatusCode,
    msg: &str,
    error: &CatalogError,
) -> (StatusCode, Json<ErrorBody>) {
    (status, Json(ErrorBody { msg: msg.to_string(), error: error.to_string() }))
}

async fn list_products(
    State(state): State<ProductsState>,
) -> Result<Json<ProductsResponse>, (StatusCode, Json<ErrorBody>)> {
    match state.store.list_products().await {
        Ok(products) => Ok(Json(ProductsResponse { products })),
        Err(error) => {
            error!(
                event_name = "catalog.products.list_failed",
                error = %error,
                "could not get products"
            );
            Err(reply_error(StatusCode::INTERNAL_SERVER_ERROR, "could not get products", &error))
        }
    }
}

async fn get_product_by_id(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ErrorBody>)> {
    match state.store.find_by_id(ProductId(id)).await {
        Ok(product) => Ok(Json(ProductResponse { product })),
        Err(error @ CatalogError::NotFound) => {
            warn!(event_name = "catalog.products.not_found", product_id = id, "product not found");
            Err(reply_error(StatusCode::NOT_FOUND, "product not found", &error))
        }
        Err(error) => {
            error!(
                event_name = "catalog.products.get_failed",
                product_id = id,
                error = %error,
                "could not get product"
            );
            Err(reply_error(StatusCode::INTERNAL_SERVER_ERROR, "could not get product", &error))
        }
    }
}

async fn decrement_product_quantity(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    match state.store.decrement_quantity(ProductId(id)).await {
        Ok(()) => {
            info!(
                event_name = "catalog.products.decremented",
                product_id = id,
                "product quantity decremented"
            );
            Ok(StatusCode::OK)
        }
        Err(error @ CatalogError::NotFound) => {
            warn!(
                event_name = "catalog.products.decrement_missing",
                product_id = id,
                "decrement requested for a product that does not exist"
            );
            Err(reply_error(
                StatusCode::NOT_FOUND,
                "cannot decrement quantity of product that does not exist",
                &error,
            ))
        }
        Err(error @ CatalogError::InsufficientInventory) => {
            warn!(
                event_name = "catalog.products.decrement_rejected",
                product_id = id,
                "decrement requested with no inventory left"
            );
            Err(reply_error(StatusCode::BAD_REQUEST, "could not decrement", &error))
        }
        Err(error) => {
            error!(
                event_name = "catalog.products.decrement_failed",
                product_id = id,
                error = %error,
                "could not decrement"
            );
            Err(reply_error(StatusCode::INTERNAL_SERVER_ERROR, "could not decrement", &error))
        }
    }
}
