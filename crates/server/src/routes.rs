pub mod carts;
pub mod params;
pub mod products;

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, MethodRouter},
    Json, Router,
};
use common::types::{ErrorEnvelope, Health};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::handle_panic;
use crate::state::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// GET / lists the available endpoints.
pub async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the e-commerce API",
        "endpoints": {
            "products": {
                "getAll": "GET /api/products",
                "getById": "GET /api/products/:pid",
                "create": "POST /api/products",
                "update": "PUT /api/products/:pid",
                "delete": "DELETE /api/products/:pid"
            },
            "carts": {
                "getAll": "GET /api/carts",
                "create": "POST /api/carts",
                "getById": "GET /api/carts/:cid",
                "addProduct": "POST /api/carts/:cid/product/:pid",
                "removeProduct": "DELETE /api/carts/:cid/product/:pid",
                "updateQuantity": "PUT /api/carts/:cid/product/:pid",
                "clearCart": "DELETE /api/carts/:cid"
            }
        }
    }))
}

/// Unmatched path or method.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let body = ErrorEnvelope::new("Route not found").with_path(uri.to_string());
    (StatusCode::NOT_FOUND, Json(body))
}

// 未匹配的方法同样返回 404 信封，而不是空的 405
fn with_not_found(router: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    router.fallback(not_found)
}

/// Build the full application router: welcome, health, products and carts.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let products = Router::new()
        .route("/", with_not_found(get(products::list).post(products::create)))
        .route(
            "/:pid",
            with_not_found(get(products::get).put(products::update).delete(products::delete)),
        );

    let carts = Router::new()
        .route("/", with_not_found(get(carts::list).post(carts::create)))
        .route("/:cid", with_not_found(get(carts::get).delete(carts::clear)))
        .route(
            "/:cid/product/:pid",
            with_not_found(
                post(carts::add_product)
                    .delete(carts::remove_product)
                    .put(carts::update_quantity),
            ),
        );

    Router::new()
        .route("/", with_not_found(get(welcome)))
        .route("/health", with_not_found(get(health)))
        .nest("/api/products", products)
        .nest("/api/carts", carts)
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        // 响应返回时打点，包含状态码与耗时
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        // 失败（5xx 等）时以 ERROR 记录
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors)
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}
