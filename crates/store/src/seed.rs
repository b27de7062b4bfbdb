//! First-run seed data.
//!
//! When the state store holds no catalog snapshot, the repository starts
//! from this fixed catalog with matching `created` history so the system
//! is never empty on first run.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use stockledger_catalog::Product;
use stockledger_core::{ChangeId, FieldValue, ProductId};
use stockledger_ledger::{created_changes, ChangeRecord, ChangeType, FieldDelta};

/// Attribution recorded on seeded history entries.
pub const SEED_ACTOR: &str = "Admin User";

/// A seeded catalog and its matching history, ready to be adopted by a
/// freshly opened repository.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub history: Vec<ChangeRecord>,
}

/// The fixed default catalog: three products, one of which carries a
/// historical price change in addition to its creation entry.
pub fn default_catalog() -> SeedData {
    let smartphone = Product {
        id: ProductId::new(),
        name: "Smartphone X".to_string(),
        description: "Latest flagship smartphone with advanced features".to_string(),
        price: 999.99,
        category: "Electronics".to_string(),
        stock: 50,
        sku: "PHONE-X-001".to_string(),
        image_url: "https://placehold.co/300x300/e4e4e7/6366f1?text=Smartphone+X&font=open-sans"
            .to_string(),
        created_at: seed_time(2023, 5, 15, 10, 30),
        updated_at: seed_time(2023, 5, 15, 10, 30),
    };

    let laptop = Product {
        id: ProductId::new(),
        name: "Laptop Pro".to_string(),
        description: "High-performance laptop for professionals".to_string(),
        price: 1499.99,
        category: "Electronics".to_string(),
        stock: 30,
        sku: "LAPTOP-PRO-002".to_string(),
        image_url: "https://placehold.co/300x300/e4e4e7/6366f1?text=Laptop+Pro&font=open-sans"
            .to_string(),
        created_at: seed_time(2023, 6, 10, 14, 45),
        updated_at: seed_time(2023, 6, 20, 9, 15),
    };

    let headphones = Product {
        id: ProductId::new(),
        name: "Wireless Headphones".to_string(),
        description: "Premium noise-cancelling wireless headphones".to_string(),
        price: 249.99,
        category: "Audio".to_string(),
        stock: 100,
        sku: "AUDIO-HP-003".to_string(),
        image_url: "https://placehold.co/300x300/e4e4e7/6366f1?text=Headphones&font=open-sans"
            .to_string(),
        created_at: seed_time(2023, 7, 5, 11, 20),
        updated_at: seed_time(2023, 7, 5, 11, 20),
    };

    let mut history = vec![
        creation_entry(&smartphone),
        creation_entry(&laptop),
        price_change_entry(&laptop, 1399.99, 1499.99),
        creation_entry(&headphones),
    ];
    // Seed entries carry explicit ids; the audit log keeps them as-is.
    debug_assert!(history.iter().all(|entry| !entry.id.is_nil()));
    history.sort_by_key(|entry| entry.timestamp);

    SeedData {
        products: vec![smartphone, laptop, headphones],
        history,
    }
}

fn creation_entry(product: &Product) -> ChangeRecord {
    ChangeRecord {
        id: ChangeId::new(),
        product_id: product.id,
        timestamp: product.created_at,
        change_type: ChangeType::Created,
        changes: created_changes(product),
        changed_by: SEED_ACTOR.to_string(),
    }
}

fn price_change_entry(product: &Product, before: f64, after: f64) -> ChangeRecord {
    let mut changes = BTreeMap::new();
    changes.insert(
        "price".to_string(),
        FieldDelta::new(FieldValue::Number(before), FieldValue::Number(after)),
    );
    ChangeRecord {
        id: ChangeId::new(),
        product_id: product.id,
        timestamp: product.updated_at,
        change_type: ChangeType::PriceChanged,
        changes,
        changed_by: SEED_ACTOR.to_string(),
    }
}

fn seed_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("seed timestamps are valid calendar dates")
}
