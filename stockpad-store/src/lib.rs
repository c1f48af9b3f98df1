pub mod app_config;
pub mod kv;
pub mod redb_kv;
pub mod store;

pub use app_config::Config;
pub use kv::{KvError, KvStore, MemoryKv};
pub use redb_kv::RedbKv;
pub use store::{LoadWarning, Snapshot, Store, StoreError};
