use serde::{Deserialize, Serialize};

use crate::product::Product;

/// A tracked quantity (required vs. remaining) tied to a product.
///
/// The product is an embedded snapshot, not a reference: the record keeps the
/// field values it was reconciled against, and `reconcile` refreshes the
/// snapshot when the catalog entry changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub product: Product,
    pub required_count: i64,
    pub remain_count: i64,
}

impl InventoryRecord {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            required_count: 0,
            remain_count: 0,
        }
    }
}

/// Re-derive the inventory list to match the current product list.
///
/// Idempotent: when the embedded snapshots already equal the product list
/// (same products, same order, same field values) the input is returned
/// unchanged. Otherwise the list is rebuilt in product order:
/// - matching id, identical snapshot: the record is carried forward as is;
/// - matching id, changed snapshot: the snapshot is refreshed and both
///   counts are carried forward (edits to name/company/unit never lose
///   history, only a changed id does);
/// - no matching id: a fresh record with zero counts.
///
/// Records whose product no longer exists are dropped.
pub fn reconcile(products: &[Product], inventories: &[InventoryRecord]) -> Vec<InventoryRecord> {
    let aligned = inventories.len() == products.len()
        && inventories
            .iter()
            .zip(products)
            .all(|(record, product)| record.product == *product);
    if aligned {
        return inventories.to_vec();
    }

    tracing::debug!(
        products = products.len(),
        records = inventories.len(),
        "rebuilding inventory records from product list"
    );

    products
        .iter()
        .map(|product| {
            match inventories.iter().find(|r| r.product.id == product.id) {
                Some(prev) if prev.product == *product => prev.clone(),
                Some(prev) => InventoryRecord {
                    product: product.clone(),
                    required_count: prev.required_count,
                    remain_count: prev.remain_count,
                },
                None => InventoryRecord::new(product.clone()),
            }
        })
        .collect()
}
