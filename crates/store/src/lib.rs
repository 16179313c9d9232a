//! `bizgrid-store` — tenant-scoped storage boundary.
//!
//! Every operation takes the caller's `BusinessId`; the in-memory store keys
//! on it structurally, and the Postgres store (feature `postgres`) forwards
//! it to the database as a transaction-local setting so row-level security
//! policies can enforce visibility.

pub mod scoped;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use scoped::{InMemoryScopedStore, ScopedStore, StoreError};

#[cfg(feature = "postgres")]
pub use postgres::PgScopedStore;
