//! Repository seams consumed by the HTTP layer.
//!
//! Implementations can be file-backed (see `file`), database-backed, or remote.

use async_trait::async_trait;
use models::{Cart, Product};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get_by_id(&self, id: u64) -> Result<Product, ServiceError>;
    async fn create(&self, data: &Map<String, Value>) -> Result<Product, ServiceError>;
    async fn update(&self, id: u64, partial: &Map<String, Value>) -> Result<Product, ServiceError>;
    async fn delete(&self, id: u64) -> Result<Product, ServiceError>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Cart>, ServiceError>;
    async fn get_by_id(&self, id: u64) -> Result<Cart, ServiceError>;
    async fn create(&self) -> Result<Cart, ServiceError>;
    async fn add_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError>;
    async fn remove_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError>;
    async fn update_quantity(&self, cart_id: u64, product_id: u64, quantity: i64) -> Result<Cart, ServiceError>;
    async fn clear(&self, cart_id: u64) -> Result<Cart, ServiceError>;
}
