//! Service layer providing the product and cart stores.
//! - Each store owns exactly one JSON array file.
//! - Reuses entity definitions and input validation from the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod repository;

pub use file::{cart_store::CartStore, product_store::ProductStore};
pub use repository::{CartRepository, ProductRepository};
