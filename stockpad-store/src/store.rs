use serde::de::DeserializeOwned;
use thiserror::Error;

use stockpad_core::{reconcile, InventoryRecord, Product};

use crate::kv::{KvError, KvStore};

pub const KEY_PRODUCTS: &str = "products";
pub const KEY_PRODUCT_INVENTORIES: &str = "product_inventories";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write {key} to storage: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: KvError,
    },

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A per-key load failure that was recovered by resetting the affected
/// collection to empty. Surfaced to the user as a warning, never fatal.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    pub key: &'static str,
    pub reason: String,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to load saved items ({}); items will be reset: {}",
            self.key, self.reason
        )
    }
}

/// Immutable copy of the store state, returned by every mutating operation.
/// The presentation layer re-renders from the returned snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub inventories: Vec<InventoryRecord>,
}

/// Single source of truth for the two collections: the product catalog and
/// the per-product inventory records, persisted as two independent JSON
/// blobs in a key-value store.
pub struct Store {
    kv: Box<dyn KvStore>,
    products: Vec<Product>,
    inventories: Vec<InventoryRecord>,
}

impl Store {
    /// Load both collections from storage. Each key is loaded independently:
    /// a missing key yields an empty collection silently, while unreadable
    /// or malformed data yields an empty collection plus a `LoadWarning` for
    /// that key only.
    pub fn open(kv: Box<dyn KvStore>) -> (Self, Vec<LoadWarning>) {
        let mut warnings = Vec::new();
        let products = load_key(kv.as_ref(), KEY_PRODUCTS, &mut warnings);
        let inventories = load_key(kv.as_ref(), KEY_PRODUCT_INVENTORIES, &mut warnings);

        tracing::info!(
            products = products.len(),
            inventories = inventories.len(),
            warnings = warnings.len(),
            "store loaded"
        );

        let mut store = Self {
            kv,
            products,
            inventories,
        };
        // Stored data may predate the latest product edits.
        store.reconcile();
        (store, warnings)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn inventories(&self) -> &[InventoryRecord] {
        &self.inventories
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.products.clone(),
            inventories: self.inventories.clone(),
        }
    }

    /// Replace the product catalog, reconcile the inventory records against
    /// it, and persist both collections. Inventories are never implicitly
    /// reset by this call; counts carry forward wherever product ids match.
    pub fn save_products(&mut self, new_products: Vec<Product>) -> Result<Snapshot, StoreError> {
        self.products = new_products;
        self.reconcile();
        self.persist(KEY_PRODUCTS, &self.products)?;
        self.persist(KEY_PRODUCT_INVENTORIES, &self.inventories)?;
        Ok(self.snapshot())
    }

    /// Replace the inventory records, reconcile, and persist only the
    /// inventories key. The product catalog is assumed unchanged.
    pub fn save_inventories(
        &mut self,
        new_inventories: Vec<InventoryRecord>,
    ) -> Result<Snapshot, StoreError> {
        self.inventories = new_inventories;
        self.reconcile();
        self.persist(KEY_PRODUCT_INVENTORIES, &self.inventories)?;
        Ok(self.snapshot())
    }

    /// Zero out required and remaining counts on every record and persist.
    /// Callers must confirm with the user first.
    pub fn reset_counts(&mut self) -> Result<Snapshot, StoreError> {
        for record in &mut self.inventories {
            record.required_count = 0;
            record.remain_count = 0;
        }
        self.persist(KEY_PRODUCT_INVENTORIES, &self.inventories)?;
        Ok(self.snapshot())
    }

    fn reconcile(&mut self) {
        self.inventories = reconcile(&self.products, &self.inventories);
    }

    fn persist<T: serde::Serialize>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|source| StoreError::Encode { key, source })?;
        self.kv
            .set(key, &bytes)
            .map_err(|source| StoreError::Write { key, source })
    }
}

fn load_key<T: DeserializeOwned>(
    kv: &dyn KvStore,
    key: &'static str,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<T> {
    let bytes = match kv.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed");
            warnings.push(LoadWarning {
                key,
                reason: e.to_string(),
            });
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored data is malformed");
            warnings.push(LoadWarning {
                key,
                reason: e.to_string(),
            });
            Vec::new()
        }
    }
}
