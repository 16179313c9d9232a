//! Entity trait: identity + continuity across state changes.

use crate::BusinessId;

/// Entity marker + minimal interface.
///
/// Every entity in the system is tenant-scoped: it carries the id of the
/// business it belongs to, and the storage layer keys on that id.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the owning business (tenant boundary).
    fn business_id(&self) -> BusinessId;
}
