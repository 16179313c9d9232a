//! `bizgrid-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    BusinessId, DepartmentId, ExpenseId, ItemId, PackageId, PartyId, PurchaseOrderId, SaleId,
    ServiceId, StaffId, UserId, WalletId,
};
pub use money::{Currency, Money};
