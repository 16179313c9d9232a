use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Permission identifier.
///
/// Permissions are modeled as opaque strings in `resource:action` form
/// (e.g. `"staff:create"`). The wildcard permission `"*"` grants everything
/// without enumerating the catalog in tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// An unordered set of granted permission strings.
///
/// Membership is exact-string; the only special value is the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    inner: HashSet<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.inner.contains(permission.as_str())
    }

    pub fn has_wildcard(&self) -> bool {
        self.inner.contains(Permission::WILDCARD)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Default permission grants per role.
///
/// Tokens carry explicit permission lists; these defaults are what the
/// platform issues when a business has not customized its role grants.
pub fn default_grants(role: Role) -> &'static [&'static str] {
    match role {
        // Owners also need the business-settings permissions explicitly:
        // the owner bypass in `authorize` does not cover them.
        Role::Owner => &["*", "business:settings:read", "business:settings:update"],
        Role::Admin => &["*", "business:settings:read"],
        Role::Manager => &[
            "staff:read",
            "staff:create",
            "staff:update",
            "departments:read",
            "departments:create",
            "departments:update",
            "customers:read",
            "customers:create",
            "customers:update",
            "suppliers:read",
            "suppliers:create",
            "suppliers:update",
            "services:read",
            "services:create",
            "services:update",
            "packages:read",
            "packages:create",
            "packages:update",
            "inventory:read",
            "inventory:create",
            "inventory:update",
            "inventory:adjust",
            "wallets:read",
            "expenses:read",
            "expenses:create",
            "purchasing:read",
            "purchasing:create",
            "purchasing:update",
            "pos:read",
            "pos:checkout",
        ],
        Role::Staff => &[
            "customers:read",
            "services:read",
            "packages:read",
            "inventory:read",
            "pos:read",
            "pos:checkout",
        ],
        Role::Cashier => &["customers:read", "services:read", "pos:read", "pos:checkout"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_membership() {
        let set: PermissionSet = ["*"].into_iter().collect();
        assert!(set.has_wildcard());
        assert!(!set.contains(&Permission::new("staff:read")));
    }

    #[test]
    fn exact_membership() {
        let set: PermissionSet = ["staff:read", "pos:checkout"].into_iter().collect();
        assert!(set.contains(&Permission::new("staff:read")));
        assert!(!set.contains(&Permission::new("staff:create")));
        assert!(!set.has_wildcard());
    }

    #[test]
    fn owner_defaults_cover_settings_explicitly() {
        let grants = default_grants(Role::Owner);
        assert!(grants.contains(&"business:settings:update"));
    }

    #[test]
    fn cashier_defaults_are_narrow() {
        let set: PermissionSet = default_grants(Role::Cashier).iter().copied().collect();
        assert!(set.contains(&Permission::new("pos:checkout")));
        assert!(!set.contains(&Permission::new("staff:read")));
    }
}
