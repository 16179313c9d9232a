//! `bizgrid-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: roles,
//! permissions, token claims, the access check, and the navigation access
//! filter are all deterministic and IO-free. Enforcement of row visibility
//! stays in the database (RLS); this crate only decides what a caller may
//! *ask for*.

pub mod authorize;
pub mod claims;
pub mod navigation;
pub mod permissions;
pub mod roles;

pub use authorize::{AuthzError, authorize, is_allowed};
pub use claims::{Hs256TokenDecoder, JwtClaims, TokenValidationError, validate_claims};
pub use navigation::{NavItem, default_navigation, filter_navigation};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
