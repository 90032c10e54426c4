use std::sync::Arc;
use std::time::Duration;

use configs::StorageConfig;
use service::{CartRepository, CartStore, ProductRepository, ProductStore};

/// Shared handler state: one repository per resource.
#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<dyn ProductRepository>,
    pub carts: Arc<dyn CartRepository>,
}

impl ServerState {
    pub fn new(products: Arc<dyn ProductRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { products, carts }
    }

    /// Open the file-backed stores described by `storage`.
    pub async fn from_storage(storage: &StorageConfig) -> anyhow::Result<Self> {
        let timeout: Duration = storage.io_timeout();
        let products = ProductStore::new(storage.products_path(), timeout).await?;
        let carts = CartStore::new(storage.carts_path(), timeout).await?;
        Ok(Self::new(products, carts))
    }
}
