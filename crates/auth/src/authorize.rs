//! Pure access check shared by HTTP handlers and the navigation filter.
//!
//! - No IO
//! - No panics
//! - No business logic beyond the policy itself

use thiserror::Error;

use crate::{Permission, PermissionSet, Role};

/// Permissions containing this substring get no owner bypass. This is a
/// literal business rule carried over from the platform's access policy;
/// even the top tier must hold the permission (or the wildcard) explicitly.
const OWNER_CARVE_OUT: &str = "business:settings";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Decide whether a caller may exercise `required`.
///
/// Allowed when the caller holds the permission or the wildcard, or when the
/// caller is an owner. Permissions under the owner carve-out are the
/// exception: there, owners are checked like everyone else.
pub fn is_allowed(role: Role, permissions: &PermissionSet, required: &Permission) -> bool {
    if permissions.has_wildcard() || permissions.contains(required) {
        return true;
    }
    role.is_owner() && !required.as_str().contains(OWNER_CARVE_OUT)
}

/// `is_allowed`, as a `Result` for `?`-style handler guards.
pub fn authorize(
    role: Role,
    permissions: &PermissionSet,
    required: &Permission,
) -> Result<(), AuthzError> {
    if is_allowed(role, permissions, required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> PermissionSet {
        list.iter().copied().collect()
    }

    #[test]
    fn explicit_permission_allows() {
        assert!(is_allowed(
            Role::Staff,
            &perms(&["staff:read"]),
            &Permission::new("staff:read"),
        ));
    }

    #[test]
    fn missing_permission_denies() {
        let err = authorize(
            Role::Staff,
            &perms(&["staff:read"]),
            &Permission::new("staff:create"),
        )
        .unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("staff:create".to_string()));
    }

    #[test]
    fn wildcard_allows_everything() {
        assert!(is_allowed(
            Role::Cashier,
            &perms(&["*"]),
            &Permission::new("purchasing:update"),
        ));
    }

    #[test]
    fn owner_bypasses_ordinary_permissions() {
        assert!(is_allowed(
            Role::Owner,
            &PermissionSet::new(),
            &Permission::new("staff:delete"),
        ));
    }

    #[test]
    fn owner_does_not_bypass_settings_carve_out() {
        assert!(!is_allowed(
            Role::Owner,
            &PermissionSet::new(),
            &Permission::new("business:settings:update"),
        ));
        // Holding it explicitly (or via wildcard) still works.
        assert!(is_allowed(
            Role::Owner,
            &perms(&["business:settings:update"]),
            &Permission::new("business:settings:update"),
        ));
        assert!(is_allowed(
            Role::Owner,
            &perms(&["*"]),
            &Permission::new("business:settings:update"),
        ));
    }

    #[test]
    fn carve_out_matches_substring_not_prefix_only() {
        // The rule is a substring check, applied literally.
        assert!(!is_allowed(
            Role::Owner,
            &PermissionSet::new(),
            &Permission::new("admin:business:settings"),
        ));
    }
}
