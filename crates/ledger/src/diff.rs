//! Pure field-level diffing and change classification.
//!
//! [`diff`] is total over well-typed inputs: it never fails, performs no
//! IO, and is safe to call before any state has been committed.

use std::collections::BTreeMap;

use stockledger_catalog::{Product, ProductPatch};
use stockledger_core::FieldValue;

use crate::change::{ChangeType, FieldDelta};

/// Compute the field deltas between `old` and the proposed `patch`, and
/// classify the change.
///
/// Only fields present in the patch are considered, and of those only the
/// ones whose value actually differs (value equality, not key presence)
/// end up in the returned map.
///
/// Classification defaults to [`ChangeType::Updated`]. Override rules run
/// in a fixed order (price, then stock, then image URL), each replacing
/// the previous classification when its field is among the changed ones,
/// so the last matching rule wins no matter how the patch was built. The
/// returned map still records every differing field regardless of which
/// rule drove the classification. Callers depend on this exact precedence;
/// do not reorder it.
pub fn diff(old: &Product, patch: &ProductPatch) -> (BTreeMap<String, FieldDelta>, ChangeType) {
    let mut changes = BTreeMap::new();

    record_if_changed(&mut changes, "name", &old.name, patch.name.as_ref());
    record_if_changed(
        &mut changes,
        "description",
        &old.description,
        patch.description.as_ref(),
    );
    record_if_changed(&mut changes, "price", &old.price, patch.price.as_ref());
    record_if_changed(&mut changes, "category", &old.category, patch.category.as_ref());
    record_if_changed(&mut changes, "stock", &old.stock, patch.stock.as_ref());
    record_if_changed(&mut changes, "sku", &old.sku, patch.sku.as_ref());
    record_if_changed(&mut changes, "image_url", &old.image_url, patch.image_url.as_ref());

    let mut change_type = ChangeType::Updated;
    if changes.contains_key("price") {
        change_type = ChangeType::PriceChanged;
    }
    if changes.contains_key("stock") {
        change_type = ChangeType::StockChanged;
    }
    if changes.contains_key("image_url") {
        change_type = ChangeType::ImageUpdated;
    }

    (changes, change_type)
}

fn record_if_changed<T>(
    changes: &mut BTreeMap<String, FieldDelta>,
    field: &str,
    current: &T,
    proposed: Option<&T>,
) where
    T: PartialEq + Clone + Into<FieldValue>,
{
    if let Some(next) = proposed {
        if next != current {
            changes.insert(
                field.to_string(),
                FieldDelta::new(current.clone().into(), next.clone().into()),
            );
        }
    }
}

/// Changes map for a creation entry: a single `all` delta from `Null` to a
/// snapshot of the full initial field set, so consumers get a usable
/// post-state rather than an empty marker.
pub fn created_changes(product: &Product) -> BTreeMap<String, FieldDelta> {
    let mut snapshot = BTreeMap::new();
    snapshot.insert("name".to_string(), FieldValue::from(product.name.as_str()));
    snapshot.insert(
        "description".to_string(),
        FieldValue::from(product.description.as_str()),
    );
    snapshot.insert("price".to_string(), FieldValue::from(product.price));
    snapshot.insert(
        "category".to_string(),
        FieldValue::from(product.category.as_str()),
    );
    snapshot.insert("stock".to_string(), FieldValue::from(product.stock));
    snapshot.insert("sku".to_string(), FieldValue::from(product.sku.as_str()));
    snapshot.insert(
        "image_url".to_string(),
        FieldValue::from(product.image_url.as_str()),
    );

    let mut changes = BTreeMap::new();
    changes.insert(
        "all".to_string(),
        FieldDelta::new(FieldValue::Null, FieldValue::Snapshot(snapshot)),
    );
    changes
}

/// Changes map for the synthetic deletion marker appended when a product
/// is removed: a `status` transition from `active` to `deleted`. The live
/// record is gone afterwards, but its history stays queryable.
pub fn deletion_changes() -> BTreeMap<String, FieldDelta> {
    let mut changes = BTreeMap::new();
    changes.insert(
        "status".to_string(),
        FieldDelta::new(FieldValue::text("active"), FieldValue::text("deleted")),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockledger_core::ProductId;

    fn test_product() -> Product {
        Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 10.0,
            category: "Widgets".to_string(),
            stock: 5,
            sku: "WID-001".to_string(),
            image_url: "https://example.com/widget.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_differing_fields_are_recorded() {
        let product = test_product();
        let patch = ProductPatch {
            price: Some(12.0),
            stock: Some(5), // equal to the current value
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert_eq!(changes.len(), 1);
        let delta = &changes["price"];
        assert_eq!(delta.before, FieldValue::Number(10.0));
        assert_eq!(delta.after, FieldValue::Number(12.0));
        assert_eq!(change_type, ChangeType::PriceChanged);
    }

    #[test]
    fn equal_patch_diffs_to_empty_updated() {
        let product = test_product();
        let patch = ProductPatch {
            name: Some(product.name.clone()),
            price: Some(product.price),
            stock: Some(product.stock),
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert!(changes.is_empty());
        assert_eq!(change_type, ChangeType::Updated);
    }

    #[test]
    fn untracked_field_changes_classify_as_updated() {
        let product = test_product();
        let patch = ProductPatch {
            name: Some("Gadget".to_string()),
            description: Some("A gadget".to_string()),
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert_eq!(changes.len(), 2);
        assert_eq!(change_type, ChangeType::Updated);
    }

    #[test]
    fn stock_overrides_price() {
        let product = test_product();
        let patch = ProductPatch {
            price: Some(12.0),
            stock: Some(8),
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert_eq!(changes.len(), 2);
        assert_eq!(change_type, ChangeType::StockChanged);
    }

    #[test]
    fn image_url_overrides_price_and_stock() {
        let product = test_product();
        let patch = ProductPatch {
            price: Some(12.0),
            stock: Some(8),
            image_url: Some("https://example.com/new.png".to_string()),
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert!(changes.contains_key("price"));
        assert!(changes.contains_key("stock"));
        assert!(changes.contains_key("image_url"));
        assert_eq!(change_type, ChangeType::ImageUpdated);
    }

    #[test]
    fn unchanged_tracked_field_does_not_drive_classification() {
        // Price supplied but equal: the price rule must not fire, so a
        // simultaneous stock change classifies as stock_changed.
        let product = test_product();
        let patch = ProductPatch {
            price: Some(product.price),
            stock: Some(8),
            image_url: Some(product.image_url.clone()),
            ..ProductPatch::default()
        };

        let (changes, change_type) = diff(&product, &patch);

        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("stock"));
        assert_eq!(change_type, ChangeType::StockChanged);
    }

    #[test]
    fn created_changes_snapshot_full_field_set() {
        let product = test_product();
        let changes = created_changes(&product);

        assert_eq!(changes.len(), 1);
        let delta = &changes["all"];
        assert!(delta.before.is_null());
        match &delta.after {
            FieldValue::Snapshot(snapshot) => {
                assert_eq!(snapshot.len(), 7);
                assert_eq!(snapshot["name"], FieldValue::text("Widget"));
                assert_eq!(snapshot["price"], FieldValue::Number(10.0));
                assert_eq!(snapshot["stock"], FieldValue::Number(5.0));
            }
            other => panic!("expected snapshot after-state, got {other:?}"),
        }
    }

    #[test]
    fn deletion_changes_mark_status_transition() {
        let changes = deletion_changes();
        assert_eq!(changes.len(), 1);
        let delta = &changes["status"];
        assert_eq!(delta.before, FieldValue::text("active"));
        assert_eq!(delta.after, FieldValue::text("deleted"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_patch() -> impl Strategy<Value = ProductPatch> {
            (
                proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,30}"),
                proptest::option::of("[A-Za-z][A-Za-z0-9 ]{0,60}"),
                proptest::option::of(0.0_f64..10_000.0),
                proptest::option::of("[A-Za-z]{1,20}"),
                proptest::option::of(0_i64..100_000),
                proptest::option::of("[A-Z]{2,5}-[0-9]{3}"),
                proptest::option::of("https://[a-z]{3,10}\\.example/[a-z]{1,10}"),
            )
                .prop_map(
                    |(name, description, price, category, stock, sku, image_url)| ProductPatch {
                        name,
                        description,
                        price,
                        category,
                        stock,
                        sku,
                        image_url,
                    },
                )
        }

        proptest! {
            /// Every recorded change corresponds to a field supplied in the patch.
            #[test]
            fn changed_keys_are_a_subset_of_patch_keys(patch in arb_patch()) {
                let product = test_product();
                let (changes, _) = diff(&product, &patch);

                for key in changes.keys() {
                    let supplied = match key.as_str() {
                        "name" => patch.name.is_some(),
                        "description" => patch.description.is_some(),
                        "price" => patch.price.is_some(),
                        "category" => patch.category.is_some(),
                        "stock" => patch.stock.is_some(),
                        "sku" => patch.sku.is_some(),
                        "image_url" => patch.image_url.is_some(),
                        other => panic!("unexpected changed field {other}"),
                    };
                    prop_assert!(supplied, "field {} recorded but not in patch", key);
                }
            }

            /// A patch restating the current state always diffs to empty.
            #[test]
            fn identity_patch_diffs_to_empty(keep_name in any::<bool>(), keep_price in any::<bool>()) {
                let product = test_product();
                let patch = ProductPatch {
                    name: keep_name.then(|| product.name.clone()),
                    price: keep_price.then_some(product.price),
                    stock: Some(product.stock),
                    ..ProductPatch::default()
                };

                let (changes, change_type) = diff(&product, &patch);
                prop_assert!(changes.is_empty());
                prop_assert_eq!(change_type, ChangeType::Updated);
            }

            /// Classification stays `updated` unless a tracked field changed,
            /// and always upgrades when one did.
            #[test]
            fn classification_tracks_the_tracked_fields(patch in arb_patch()) {
                let product = test_product();
                let (changes, change_type) = diff(&product, &patch);

                let expected = if changes.contains_key("image_url") {
                    ChangeType::ImageUpdated
                } else if changes.contains_key("stock") {
                    ChangeType::StockChanged
                } else if changes.contains_key("price") {
                    ChangeType::PriceChanged
                } else {
                    ChangeType::Updated
                };
                prop_assert_eq!(change_type, expected);
            }
        }
    }
}
