//! Product repository: canonical current state plus audit orchestration.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use stockledger_catalog::{Product, ProductDraft, ProductPatch};
use stockledger_core::{CatalogError, CatalogResult, ProductId};
use stockledger_ledger::{
    AuditLog, ChangeRecord, ChangeType, created_changes, deletion_changes, diff,
};

use crate::seed;
use crate::state_store::{StateStore, StateStoreError};

/// Logical key holding the serialized product collection.
pub const PRODUCTS_KEY: &str = "products";
/// Logical key holding the serialized audit trail.
pub const HISTORY_KEY: &str = "product_history";

/// Owns the live catalog and its audit trail, and keeps the two
/// consistent: every mutation commits a new product state together with
/// exactly one audit entry, then refreshes the state store with whole
/// snapshots of both collections.
///
/// Construct one at startup with [`ProductRepository::open`] and pass it
/// by reference. Mutations take `&mut self`, so overlapping mutations are
/// unrepresentable without external serialization; callers that share the
/// repository across tasks are responsible for that serialization.
///
/// The state store is a best-effort cache of this in-memory source of
/// truth, not a transactional ledger: a failed save is logged and the
/// committed mutation stands.
#[derive(Debug)]
pub struct ProductRepository<S: StateStore> {
    products: Vec<Product>,
    audit: AuditLog,
    store: S,
}

impl<S: StateStore> ProductRepository<S> {
    /// Open the repository from persisted state, seeding the default
    /// catalog when no product snapshot exists. Reads each key once.
    pub async fn open(store: S) -> Self {
        let products: Option<Vec<Product>> = load_snapshot(&store, PRODUCTS_KEY).await;

        match products {
            Some(products) => {
                let history: Vec<ChangeRecord> =
                    load_snapshot(&store, HISTORY_KEY).await.unwrap_or_default();
                tracing::info!(
                    products = products.len(),
                    history = history.len(),
                    "loaded catalog state"
                );
                Self {
                    products,
                    audit: AuditLog::from_records(history),
                    store,
                }
            }
            None => {
                let seed = seed::default_catalog();
                tracing::info!(
                    products = seed.products.len(),
                    "no persisted catalog state, seeding default catalog"
                );
                let repository = Self {
                    products: seed.products,
                    audit: AuditLog::from_records(seed.history),
                    store,
                };
                repository.persist().await;
                repository
            }
        }
    }

    /// Create a product from `draft`, attributed to `actor`.
    ///
    /// Assigns a fresh id, stamps both timestamps from one clock reading,
    /// and appends the matching `created` audit entry. Never fails on
    /// valid input: a persistence failure is reported as a warning.
    pub async fn create(&mut self, draft: ProductDraft, actor: &str) -> Product {
        let now = Utc::now();
        let product = draft.into_product(ProductId::new(), now);

        let entry = ChangeRecord::draft(
            product.id,
            now,
            ChangeType::Created,
            created_changes(&product),
            actor,
        );
        self.products.push(product.clone());
        self.audit.append(entry);
        tracing::debug!(product_id = %product.id, "product created");

        self.persist().await;
        product
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Apply `patch` to the product with `id`, attributed to `actor`.
    ///
    /// Merges only the supplied fields and advances `updated_at`
    /// unconditionally: a patch that changes nothing still produces an
    /// `updated` audit entry with an empty changes map. Exactly one entry
    /// is appended per call, and the new state and its entry commit
    /// together: a `NotFound` failure leaves both collections untouched.
    pub async fn update(
        &mut self,
        id: ProductId,
        patch: ProductPatch,
        actor: &str,
    ) -> CatalogResult<Product> {
        let index = self
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or(CatalogError::NotFound)?;

        let now = Utc::now();
        let (changes, change_type) = diff(&self.products[index], &patch);
        let changed_fields = changes.len();

        let product = &mut self.products[index];
        patch.apply_to(product);
        product.updated_at = now;
        let updated = product.clone();

        self.audit
            .append(ChangeRecord::draft(id, now, change_type, changes, actor));
        tracing::debug!(
            product_id = %id,
            change_type = %change_type,
            changed_fields,
            "product updated"
        );

        self.persist().await;
        Ok(updated)
    }

    /// Remove the product with `id`, attributed to `actor`.
    ///
    /// The live record is dropped; its history stays untouched and gains
    /// one final synthetic entry marking the `active` → `deleted` status
    /// transition, so the product remains queryable through the audit
    /// trail after it no longer exists here.
    pub async fn delete(&mut self, id: ProductId, actor: &str) -> CatalogResult<()> {
        let index = self
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or(CatalogError::NotFound)?;

        self.products.remove(index);
        self.audit.append(ChangeRecord::draft(
            id,
            Utc::now(),
            ChangeType::Updated,
            deletion_changes(),
            actor,
        ));
        tracing::debug!(product_id = %id, "product deleted");

        self.persist().await;
        Ok(())
    }

    /// Audit history for one product, most recent first. Works for
    /// deleted products too.
    pub fn history(&self, id: ProductId) -> Vec<ChangeRecord> {
        self.audit.for_product(id)
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Refresh both whole snapshots in the state store. Failures are
    /// warnings: the in-memory state remains authoritative.
    async fn persist(&self) {
        self.save_snapshot(PRODUCTS_KEY, &self.products).await;
        self.save_snapshot(HISTORY_KEY, self.audit.records()).await;
    }

    async fn save_snapshot<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = match serde_json::to_vec(value) {
            Ok(blob) => self.store.save(key, &blob).await,
            Err(err) => Err(StateStoreError::serialize(err.to_string())),
        };
        if let Err(err) = result {
            tracing::warn!(key, %err, "state snapshot save failed, in-memory state stands");
        }
    }
}

async fn load_snapshot<S: StateStore, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let blob = match store.load(key).await {
        Ok(blob) => blob?,
        Err(err) => {
            tracing::warn!(key, %err, "state load failed, ignoring stored snapshot");
            return None;
        }
    };

    match serde_json::from_slice(&blob) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, %err, "state snapshot unreadable, ignoring it");
            None
        }
    }
}
