use std::{path::PathBuf, sync::Arc, time::Duration};
use serde_json::{Map, Value};
use tracing::{debug, info};

use models::{NewProduct, Product, ProductPatch};
use crate::errors::ServiceError;
use crate::repository::ProductRepository;
use crate::storage::{next_id, JsonArrayStore};

/// Product catalog persisted as a JSON array (`products.json`).
#[derive(Clone)]
pub struct ProductStore {
    store: Arc<JsonArrayStore<Product>>,
}

impl ProductStore {
    /// Initialize the store, creating an empty file if it does not exist.
    pub async fn new<P: Into<PathBuf>>(path: P, io_timeout: Duration) -> Result<Arc<Self>, ServiceError> {
        let store = JsonArrayStore::<Product>::open(path, io_timeout).await?;
        Ok(Arc::new(Self { store }))
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<Product, ServiceError> {
        debug!(product_id = id, "get product");
        self.store
            .read(|items| {
                items
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or_else(|| ServiceError::not_found("product", id))
            })
            .await
    }

    /// Validate, assign the next id and append.
    pub async fn create(&self, data: &Map<String, Value>) -> Result<Product, ServiceError> {
        if data.contains_key("id") {
            return Err(ServiceError::Validation("id must not be provided, it is generated automatically".into()));
        }
        let draft = NewProduct::from_json(data)?;

        let created = self
            .store
            .mutate(|items| {
                if items.iter().any(|p| p.code == draft.code) {
                    return Err(ServiceError::Conflict(format!("a product with code '{}' already exists", draft.code)));
                }
                let product = draft.into_product(next_id(items));
                items.push(product.clone());
                Ok(product)
            })
            .await?;
        info!(product_id = created.id, code = %created.code, "product created");
        Ok(created)
    }

    /// Shallow merge of `partial` onto the stored record. The id never changes.
    pub async fn update(&self, id: u64, partial: &Map<String, Value>) -> Result<Product, ServiceError> {
        let updated = self
            .store
            .mutate(|items| {
                let idx = items
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| ServiceError::not_found("product", id))?;
                if partial.contains_key("id") {
                    return Err(ServiceError::Validation("the product id cannot be updated".into()));
                }
                let patch = ProductPatch::from_json(partial)?;
                if let Some(code) = patch.code.as_deref() {
                    if items.iter().any(|p| p.code == code && p.id != id) {
                        return Err(ServiceError::Conflict(format!("another product already uses code '{code}'")));
                    }
                }
                items[idx].apply(patch);
                Ok(items[idx].clone())
            })
            .await?;
        info!(product_id = id, "product updated");
        Ok(updated)
    }

    /// Remove and return the record.
    pub async fn delete(&self, id: u64) -> Result<Product, ServiceError> {
        let removed = self
            .store
            .mutate(|items| {
                let idx = items
                    .iter()
                    .position(|p| p.id == id)
                    .ok_or_else(|| ServiceError::not_found("product", id))?;
                Ok(items.remove(idx))
            })
            .await?;
        info!(product_id = id, code = %removed.code, "product deleted");
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> { self.list().await }
    async fn get_by_id(&self, id: u64) -> Result<Product, ServiceError> { self.get_by_id(id).await }
    async fn create(&self, data: &Map<String, Value>) -> Result<Product, ServiceError> { self.create(data).await }
    async fn update(&self, id: u64, partial: &Map<String, Value>) -> Result<Product, ServiceError> { self.update(id, partial).await }
    async fn delete(&self, id: u64) -> Result<Product, ServiceError> { self.delete(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Number};
    use uuid::Uuid;

    async fn setup_store() -> (Arc<ProductStore>, PathBuf) {
        let path = std::env::temp_dir().join(format!("svc_products_{}.json", Uuid::new_v4()));
        let store = ProductStore::new(&path, Duration::from_secs(5)).await.expect("store init");
        (store, path)
    }

    fn input(code: &str) -> Map<String, Value> {
        match json!({
            "title": "Yerba",
            "description": "Yerba mate 1kg",
            "code": code,
            "price": 4.75,
            "stock": 30,
            "category": "food"
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object")
    }

    #[tokio::test]
    async fn create_assigns_ids_and_lists() -> Result<(), anyhow::Error> {
        let (store, path) = setup_store().await;

        let first = store.create(&input("Y-1")).await?;
        let second = store.create(&input("Y-2")).await?;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.status);
        assert!(first.thumbnails.is_empty());

        let list = store.list().await?;
        assert_eq!(list.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(store.get_by_id(2).await?.code, "Y-2");

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn create_validation_and_conflict() -> Result<(), anyhow::Error> {
        let (store, path) = setup_store().await;

        let mut missing = input("Y-1");
        missing.remove("category");
        match store.create(&missing).await {
            Err(ServiceError::Model(e)) => assert_eq!(e.field(), Some("category")),
            other => panic!("expected model error, got {other:?}"),
        }

        let mut bad_price = input("Y-1");
        bad_price.insert("price".into(), json!(0));
        assert!(store.create(&bad_price).await.unwrap_err().is_client_error());

        let mut bad_stock = input("Y-1");
        bad_stock.insert("stock".into(), json!(-1));
        assert!(matches!(store.create(&bad_stock).await, Err(ServiceError::Model(_))));

        let mut with_id = input("Y-1");
        with_id.insert("id".into(), json!(9));
        assert!(matches!(store.create(&with_id).await, Err(ServiceError::Validation(_))));

        store.create(&input("Y-1")).await?;
        assert!(matches!(store.create(&input("Y-1")).await, Err(ServiceError::Conflict(_))));
        assert_eq!(store.list().await?.len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_and_guards_id_and_code() -> Result<(), anyhow::Error> {
        let (store, path) = setup_store().await;
        let a = store.create(&input("A")).await?;
        store.create(&input("B")).await?;

        let updated = store.update(a.id, &obj(json!({"price": 9.5, "stock": 0}))).await?;
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.price, 9.5);
        assert_eq!(updated.stock, Number::from(0));
        assert_eq!(updated.title, a.title);
        assert_eq!(store.get_by_id(a.id).await?, updated);

        assert!(matches!(store.update(a.id, &obj(json!({"id": 5}))).await, Err(ServiceError::Validation(_))));
        assert!(matches!(store.update(99, &obj(json!({"price": 1}))).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.update(a.id, &obj(json!({"code": "B"}))).await, Err(ServiceError::Conflict(_))));

        // unknown keys are dropped, the record keeps its schema
        let unchanged = store.update(a.id, &obj(json!({"color": "blue"}))).await?;
        assert_eq!(unchanged, updated);
        let half = store.update(a.id, &obj(json!({"stock": 2.5, "color": "blue"}))).await?;
        assert_eq!(half.stock.as_f64(), Some(2.5));
        assert!(matches!(store.update(a.id, &obj(json!({"status": null}))).await, Err(ServiceError::Model(_))));

        // keeping its own code is not a conflict
        let same = store.update(a.id, &obj(json!({"code": "A", "title": "Yerba suave"}))).await?;
        assert_eq!(same.title, "Yerba suave");

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_create_reuses_max_id() -> Result<(), anyhow::Error> {
        let (store, path) = setup_store().await;
        store.create(&input("A")).await?;
        let b = store.create(&input("B")).await?;

        let removed = store.delete(b.id).await?;
        assert_eq!(removed, b);
        assert!(store.list().await?.iter().all(|p| p.id != b.id));
        assert!(matches!(store.delete(b.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.get_by_id(b.id).await, Err(ServiceError::NotFound(_))));

        let c = store.create(&input("C")).await?;
        assert_eq!(c.id, b.id);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
