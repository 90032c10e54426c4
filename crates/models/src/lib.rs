//! Entities persisted by the shop API and the parsing rules for client input.
//!
//! - `product`: catalog records plus create/patch input validation.
//! - `cart`: carts and their line items.

pub mod errors;
pub mod product;
pub mod cart;

pub use cart::{Cart, LineItem};
pub use errors::ModelError;
pub use product::{NewProduct, Product, ProductPatch};

/// Anything stored in a collection keyed by a store-assigned integer id.
pub trait Identified {
    fn id(&self) -> u64;
}
