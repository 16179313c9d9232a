//! `bizgrid-purchasing` — purchase orders against suppliers.

pub mod order;

pub use order::{OrderLine, PurchaseOrder, PurchaseOrderStatus, Receipt};
