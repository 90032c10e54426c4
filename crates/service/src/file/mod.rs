//! File-backed implementations of the shop repositories.

pub mod product_store;
pub mod cart_store;
