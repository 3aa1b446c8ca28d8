use axum::extract::{Path, State};
use axum::response::Json;

use crate::database::models::Product;
use crate::database::repository::ProductRepository;
use crate::error::ApiError;
use crate::AppState;

/// GET /products - all non-deleted products
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let repo = ProductRepository::new(state.pool.clone());
    let products = repo.list().await?;

    Ok(Json(products))
}

/// GET /products/:id - single product by numeric id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    // A malformed id can never match a record, so it is a 404 here
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::not_found("product not found"))?;

    let repo = ProductRepository::new(state.pool.clone());
    match repo.find_by_id(id).await? {
        Some(product) => Ok(Json(product)),
        None => Err(ApiError::not_found("product not found")),
    }
}
