//! `stockledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the closed
//! field-value variant used by the change diff engine.

pub mod error;
pub mod id;
pub mod value;

pub use error::{CatalogError, CatalogResult};
pub use id::{ChangeId, ProductId};
pub use value::FieldValue;
