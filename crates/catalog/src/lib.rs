//! Catalog domain module.
//!
//! This crate contains the product record and its mutation payloads,
//! implemented purely as deterministic domain data (no IO, no storage).

pub mod product;

pub use product::{Product, ProductDraft, ProductPatch};
