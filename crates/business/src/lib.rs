//! `bizgrid-business` — the business profile/settings record.

pub mod profile;

pub use profile::BusinessProfile;
