pub mod export;
pub mod inventory;
pub mod product;
pub mod table;

pub use export::{group_by_company, CompanyGroup};
pub use inventory::{reconcile, InventoryRecord};
pub use product::Product;
