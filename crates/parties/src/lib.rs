//! `bizgrid-parties` — customers and suppliers.
//!
//! Both are the same record shape with a `PartyKind` discriminator; the API
//! exposes them as separate resources and filters on the kind.

pub mod party;

pub use party::{ContactInfo, Party, PartyKind, PartyStatus};
