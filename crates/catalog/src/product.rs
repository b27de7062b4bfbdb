use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::ProductId;

/// Current-state record for one catalog product.
///
/// Owned exclusively by the repository: callers observe products through
/// shared references or clones and mutate them only through repository
/// operations, which keep the audit trail consistent with the record.
///
/// `stock` is kept signed; non-negativity is a convention of the callers,
/// not an invariant enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, immutable once assigned.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub sku: String,
    pub image_url: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Non-decreasing: advanced on every mutation, including no-op updates.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product: everything the caller supplies, i.e. a
/// [`Product`] minus the repository-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub sku: String,
    pub image_url: String,
}

impl ProductDraft {
    /// Materialize the draft into a full record, stamping both timestamps
    /// from the same clock reading.
    pub fn into_product(self, id: ProductId, at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            stock: self.stock,
            sku: self.sku,
            image_url: self.image_url,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Partial update payload: only fields that are `Some` participate in the
/// merge and in diffing. An all-`None` patch is a valid no-op update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.stock.is_none()
            && self.sku.is_none()
            && self.image_url.is_none()
    }

    /// Merge the supplied fields onto `product`, leaving absent fields and
    /// both timestamps untouched. Timestamp advancement is the
    /// repository's job, not the patch's.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = image_url.clone();
        }
    }
}
