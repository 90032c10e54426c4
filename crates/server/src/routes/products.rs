use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use models::Product;

use crate::errors::JsonApiError;
use crate::routes::params::{self, Fields};
use crate::state::ServerState;

type ApiResult<T> = Result<T, JsonApiError>;

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> ApiResult<Json<Envelope<Vec<Product>>>> {
    let items = state
        .products
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching products"))?;
    Ok(Json(Envelope::success(items)))
}

/// GET /api/products/:pid
pub async fn get(State(state): State<ServerState>, Path(pid): Path<String>) -> ApiResult<Json<Envelope<Product>>> {
    let id = params::parse_id(&pid)?;
    let product = state
        .products
        .get_by_id(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching product"))?;
    Ok(Json(Envelope::success(product)))
}

/// POST /api/products
pub async fn create(State(state): State<ServerState>, body: Fields) -> ApiResult<(StatusCode, Json<Envelope<Product>>)> {
    let data = body.non_empty("Product data must be provided")?;
    if data.contains_key("id") {
        return Err(JsonApiError::bad_request("The id must not be provided, it is generated automatically"));
    }
    let created = state
        .products
        .create(&data)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error creating product"))?;
    Ok((StatusCode::CREATED, Json(Envelope::with_message("Product created successfully", created))))
}

/// PUT /api/products/:pid
pub async fn update(
    State(state): State<ServerState>,
    Path(pid): Path<String>,
    body: Fields,
) -> ApiResult<Json<Envelope<Product>>> {
    let id = params::parse_id(&pid)?;
    let updates = body.non_empty("At least one field to update must be provided")?;
    if updates.contains_key("id") {
        return Err(JsonApiError::bad_request("The product id cannot be updated"));
    }
    let updated = state
        .products
        .update(id, &updates)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error updating product"))?;
    Ok(Json(Envelope::with_message("Product updated successfully", updated)))
}

/// DELETE /api/products/:pid
pub async fn delete(State(state): State<ServerState>, Path(pid): Path<String>) -> ApiResult<Json<Envelope<Product>>> {
    let id = params::parse_id(&pid)?;
    let removed = state
        .products
        .delete(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error deleting product"))?;
    Ok(Json(Envelope::with_message("Product deleted successfully", removed)))
}
