use std::sync::Arc;

use stockpad_core::{InventoryRecord, Product};
use stockpad_store::store::{KEY_PRODUCTS, KEY_PRODUCT_INVENTORIES};
use stockpad_store::{KvStore, MemoryKv, RedbKv, Store};

fn product(id: i64, name: &str, company: &str, unit: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        company: company.to_string(),
        unit: unit.to_string(),
        visible: true,
    }
}

#[test]
fn storage_roundtrip_yields_identical_lists() {
    let kv = Arc::new(MemoryKv::new());

    let (mut store, _) = Store::open(Box::new(kv.clone()));
    store
        .save_products(vec![
            product(1, "Flour", "Miller Co", "kg"),
            product(2, "Salt", "Sea Co", "g"),
        ])
        .unwrap();

    let mut edited = store.inventories().to_vec();
    edited[0].required_count = 3;
    edited[1].remain_count = 5;
    let saved = store.save_inventories(edited).unwrap();

    let (reloaded, warnings) = Store::open(Box::new(kv));
    assert!(warnings.is_empty());
    assert_eq!(reloaded.products(), saved.products.as_slice());
    assert_eq!(reloaded.inventories(), saved.inventories.as_slice());
}

#[test]
fn malformed_json_under_one_key_does_not_affect_the_other() {
    let kv = Arc::new(MemoryKv::new());

    let (mut store, _) = Store::open(Box::new(kv.clone()));
    store
        .save_products(vec![product(1, "Flour", "Miller Co", "kg")])
        .unwrap();

    // Corrupt only the inventories blob.
    kv.set(KEY_PRODUCT_INVENTORIES, b"{not json").unwrap();

    let (reloaded, warnings) = Store::open(Box::new(kv.clone()));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, KEY_PRODUCT_INVENTORIES);
    assert_eq!(reloaded.products().len(), 1);
    // Reconciliation rebuilt zero-count records for the surviving products.
    assert_eq!(reloaded.inventories().len(), 1);
    assert_eq!(reloaded.inventories()[0].required_count, 0);

    // And the other way around.
    kv.set(KEY_PRODUCTS, b"][").unwrap();
    let inventories_json =
        serde_json::to_vec(&vec![InventoryRecord::new(product(1, "Flour", "Miller Co", "kg"))])
            .unwrap();
    kv.set(KEY_PRODUCT_INVENTORIES, &inventories_json).unwrap();

    let (reloaded, warnings) = Store::open(Box::new(kv));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, KEY_PRODUCTS);
    assert!(reloaded.products().is_empty());
    // With no products left, reconciliation drops every record.
    assert!(reloaded.inventories().is_empty());
}

#[test]
fn save_products_reconciles_instead_of_resetting() {
    let kv = Arc::new(MemoryKv::new());
    let (mut store, _) = Store::open(Box::new(kv));

    store
        .save_products(vec![product(1, "Flour", "Miller Co", "kg")])
        .unwrap();
    let mut edited = store.inventories().to_vec();
    edited[0].required_count = 9;
    edited[0].remain_count = 2;
    store.save_inventories(edited).unwrap();

    // Rename the product and append a new one; counts must survive the save.
    let snapshot = store
        .save_products(vec![
            product(1, "Bread flour", "Miller Co", "kg"),
            product(2, "Salt", "Sea Co", "g"),
        ])
        .unwrap();

    assert_eq!(snapshot.inventories.len(), 2);
    assert_eq!(snapshot.inventories[0].product.name, "Bread flour");
    assert_eq!(snapshot.inventories[0].required_count, 9);
    assert_eq!(snapshot.inventories[0].remain_count, 2);
    assert_eq!(snapshot.inventories[1].required_count, 0);
}

#[test]
fn redb_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stockpad.redb");

    {
        let kv = RedbKv::open(&path).unwrap();
        let (mut store, _) = Store::open(Box::new(kv));
        store
            .save_products(vec![product(1, "Flour", "Miller Co", "kg")])
            .unwrap();
        let mut edited = store.inventories().to_vec();
        edited[0].required_count = 4;
        store.save_inventories(edited).unwrap();
    }

    let kv = RedbKv::open(&path).unwrap();
    let (store, warnings) = Store::open(Box::new(kv));
    assert!(warnings.is_empty());
    assert_eq!(store.products().len(), 1);
    assert_eq!(store.inventories()[0].required_count, 4);
}
