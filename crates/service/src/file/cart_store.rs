use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info};

use models::Cart;
use crate::errors::ServiceError;
use crate::repository::CartRepository;
use crate::storage::{next_id, JsonArrayStore};

/// Carts persisted as a JSON array (`carts.json`).
///
/// Line items hold raw product ids; the catalog is never consulted.
#[derive(Clone)]
pub struct CartStore {
    store: Arc<JsonArrayStore<Cart>>,
}

impl CartStore {
    /// Initialize the store, creating an empty file if it does not exist.
    pub async fn new<P: Into<PathBuf>>(path: P, io_timeout: Duration) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::<Cart>::open(path, io_timeout).await?;
        Ok(Arc::new(Self { store }))
    }

    pub async fn list(&self) -> Result<Vec<Cart>, ServiceError> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Cart, ServiceError> {
        debug!(cart_id = id, "get cart");
        self.store
            .read(|carts| {
                carts
                    .iter()
                    .find(|c| c.id == id)
                    .cloned()
                    .ok_or_else(|| ServiceError::not_found("cart", id))
            })
            .await
    }

    pub async fn create(&self) -> Result<Cart, ServiceError> {
        let cart = self
            .store
            .mutate(|carts| {
                let cart = Cart::new(next_id(carts));
                carts.push(cart.clone());
                Ok(cart)
            })
            .await?;
        info!(cart_id = cart.id, "cart created");
        Ok(cart)
    }

    pub async fn add_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError> {
        let cart = self.with_cart(cart_id, |cart| {
            cart.add_one(product_id);
            Ok(())
        })
        .await?;
        info!(cart_id, product_id, "product added to cart");
        Ok(cart)
    }

    pub async fn remove_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError> {
        let cart = self.with_cart(cart_id, |cart| {
            cart.remove_line(product_id)
                .map(|_| ())
                .ok_or_else(|| line_not_found(cart_id, product_id))
        })
        .await?;
        info!(cart_id, product_id, "product removed from cart");
        Ok(cart)
    }

    /// Absolute set of the line quantity, not an increment.
    pub async fn update_quantity(&self, cart_id: u64, product_id: u64, quantity: i64) -> Result<Cart, ServiceError> {
        let cart = self.with_cart(cart_id, |cart| {
            let line = cart.line_mut(product_id).ok_or_else(|| line_not_found(cart_id, product_id))?;
            if quantity <= 0 {
                return Err(ServiceError::Validation("quantity must be greater than 0".into()));
            }
            line.quantity = u32::try_from(quantity)
                .map_err(|_| ServiceError::Validation(format!("quantity must not exceed {}", u32::MAX)))?;
            Ok(())
        })
        .await?;
        info!(cart_id, product_id, quantity, "cart quantity updated");
        Ok(cart)
    }

    pub async fn clear(&self, cart_id: u64) -> Result<Cart, ServiceError> {
        let cart = self.with_cart(cart_id, |cart| {
            cart.clear();
            Ok(())
        })
        .await?;
        info!(cart_id, "cart cleared");
        Ok(cart)
    }

    /// Locate one cart, apply `f` and persist; returns the cart after `f`.
    async fn with_cart<F>(&self, cart_id: u64, f: F) -> Result<Cart, ServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), ServiceError>,
    {
        self.store
            .mutate(|carts| {
                let cart = carts
                    .iter_mut()
                    .find(|c| c.id == cart_id)
                    .ok_or_else(|| ServiceError::not_found("cart", cart_id))?;
                f(&mut *cart)?;
                Ok(cart.clone())
            })
            .await
    }
}

fn line_not_found(cart_id: u64, product_id: u64) -> ServiceError {
    ServiceError::NotFound(format!("product {product_id} not found in cart {cart_id}"))
}

#[async_trait::async_trait]
impl CartRepository for CartStore {
    async fn list(&self) -> Result<Vec<Cart>, ServiceError> { self.list().await }
    async fn get_by_id(&self, id: u64) -> Result<Cart, ServiceError> { self.get_by_id(id).await }
    async fn create(&self) -> Result<Cart, ServiceError> { self.create().await }
    async fn add_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError> { self.add_product(cart_id, product_id).await }
    async fn remove_product(&self, cart_id: u64, product_id: u64) -> Result<Cart, ServiceError> { self.remove_product(cart_id, product_id).await }
    async fn update_quantity(&self, cart_id: u64, product_id: u64, quantity: i64) -> Result<Cart, ServiceError> { self.update_quantity(cart_id, product_id, quantity).await }
    async fn clear(&self, cart_id: u64) -> Result<Cart, ServiceError> { self.clear(cart_id).await }
}
