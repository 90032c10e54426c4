//! Storage abstractions for service layer
//!
//! Contains the file-backed collection store shared by the product and
//! cart stores so neither re-implements load/save.

pub mod json_array_store;

pub use json_array_store::{next_id, JsonArrayStore};
