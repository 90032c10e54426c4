use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use models::Cart;

use crate::errors::JsonApiError;
use crate::routes::params::{self, Fields};
use crate::state::ServerState;

type ApiResult<T> = Result<T, JsonApiError>;

fn ids(cid: &str, pid: &str) -> ApiResult<(u64, u64)> {
    Ok((params::parse_id(cid)?, params::parse_id(pid)?))
}

/// GET /api/carts
pub async fn list(State(state): State<ServerState>) -> ApiResult<Json<Envelope<Vec<Cart>>>> {
    let carts = state
        .carts
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching carts"))?;
    Ok(Json(Envelope::success(carts)))
}

/// POST /api/carts
pub async fn create(State(state): State<ServerState>) -> ApiResult<(StatusCode, Json<Envelope<Cart>>)> {
    let cart = state
        .carts
        .create()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error creating cart"))?;
    Ok((StatusCode::CREATED, Json(Envelope::with_message("Cart created successfully", cart))))
}

/// GET /api/carts/:cid
pub async fn get(State(state): State<ServerState>, Path(cid): Path<String>) -> ApiResult<Json<Envelope<Cart>>> {
    let id = params::parse_id(&cid)?;
    let cart = state
        .carts
        .get_by_id(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching cart"))?;
    Ok(Json(Envelope::success(cart)))
}

/// POST /api/carts/:cid/product/:pid
pub async fn add_product(
    State(state): State<ServerState>,
    Path((cid, pid)): Path<(String, String)>,
) -> ApiResult<Json<Envelope<Cart>>> {
    let (cart_id, product_id) = ids(&cid, &pid)?;
    let cart = state
        .carts
        .add_product(cart_id, product_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error adding product to cart"))?;
    Ok(Json(Envelope::with_message("Product added to cart successfully", cart)))
}

/// DELETE /api/carts/:cid/product/:pid
pub async fn remove_product(
    State(state): State<ServerState>,
    Path((cid, pid)): Path<(String, String)>,
) -> ApiResult<Json<Envelope<Cart>>> {
    let (cart_id, product_id) = ids(&cid, &pid)?;
    let cart = state
        .carts
        .remove_product(cart_id, product_id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error removing product from cart"))?;
    Ok(Json(Envelope::with_message("Product removed from cart successfully", cart)))
}

/// PUT /api/carts/:cid/product/:pid with `{"quantity": n}` or `quantity=n`
pub async fn update_quantity(
    State(state): State<ServerState>,
    Path((cid, pid)): Path<(String, String)>,
    Fields(body): Fields,
) -> ApiResult<Json<Envelope<Cart>>> {
    let (cart_id, product_id) = ids(&cid, &pid)?;
    let quantity = params::quantity(&body)?;
    let cart = state
        .carts
        .update_quantity(cart_id, product_id, quantity)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error updating quantity"))?;
    Ok(Json(Envelope::with_message("Quantity updated successfully", cart)))
}

/// DELETE /api/carts/:cid
pub async fn clear(State(state): State<ServerState>, Path(cid): Path<String>) -> ApiResult<Json<Envelope<Cart>>> {
    let id = params::parse_id(&cid)?;
    let cart = state
        .carts
        .clear(id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error clearing cart"))?;
    Ok(Json(Envelope::with_message("Cart cleared successfully", cart)))
}
