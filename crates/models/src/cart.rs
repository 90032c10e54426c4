use serde::{Deserialize, Serialize};

use crate::Identified;

/// One `(product id, quantity)` pair. The product id is not checked against the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: u64,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: u64,
    #[serde(default)]
    pub products: Vec<LineItem>,
}

impl Identified for Cart {
    fn id(&self) -> u64 {
        self.id
    }
}

impl Cart {
    pub fn new(id: u64) -> Self {
        Self { id, products: Vec::new() }
    }

    /// Bump the quantity of an existing line, or append a new one with quantity 1.
    pub fn add_one(&mut self, product: u64) {
        match self.products.iter_mut().find(|item| item.product == product) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.products.push(LineItem { product, quantity: 1 }),
        }
    }

    pub fn line_mut(&mut self, product: u64) -> Option<&mut LineItem> {
        self.products.iter_mut().find(|item| item.product == product)
    }

    /// Returns the removed line, if there was one.
    pub fn remove_line(&mut self, product: u64) -> Option<LineItem> {
        let idx = self.products.iter().position(|item| item.product == product)?;
        Some(self.products.remove(idx))
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}
