//! Store layer: persistence boundary, bootstrap seed, and the product
//! repository that orchestrates mutations against the audit trail.

pub mod file_store;
pub mod repository;
pub mod seed;
pub mod state_store;


pub use file_store::FileStateStore;
pub use repository::{HISTORY_KEY, PRODUCTS_KEY, ProductRepository};
pub use state_store::{InMemoryStateStore, StateStore, StateStoreError};
