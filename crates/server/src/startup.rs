use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Open the stores and assemble the router without binding a socket.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.storage.data_dir).await?;
    let state = ServerState::from_storage(&cfg.storage).await?;
    info!(
        products = %cfg.storage.products_path().display(),
        carts = %cfg.storage.carts_path().display(),
        "stores opened"
    );
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server until it fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "shop api listening");
    info!("products: http://{addr}/api/products");
    info!("carts:    http://{addr}/api/carts");
    axum::serve(listener, app).await?;
    Ok(())
}
