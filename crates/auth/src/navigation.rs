//! Navigation access filter.
//!
//! The frontend's sidebar is a static tree of items, each optionally gated by
//! a required role or a required permission. Given a caller's role and grant
//! set, `filter_navigation` prunes the tree down to what that caller may see.
//!
//! Rules:
//! - A node passes its own gate iff its `required_role` (if any) equals the
//!   caller's role AND its `required_permission` (if any) clears `is_allowed`
//!   (held, wildcard, or owner bypass minus the settings carve-out).
//! - Children are filtered before the parent decision. A parent with a `path`
//!   survives with an empty child list; a parent without a `path` and without
//!   surviving children is dropped.
//! - Absent gate fields mean "unrestricted". The input is never mutated.

use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionSet, Role, authorize::is_allowed};

/// One entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,

    /// Route the entry links to. Section headers that only group children
    /// have no path of their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<Permission>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// A linkable entry with no gates.
    pub fn link(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            required_role: None,
            required_permission: None,
            children: Vec::new(),
        }
    }

    /// A pathless grouping header.
    pub fn section(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            required_role: None,
            required_permission: None,
            children: Vec::new(),
        }
    }

    pub fn requires(mut self, permission: impl Into<Permission>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    pub fn only_for(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }
}

/// Filter a navigation tree down to what the caller may see.
///
/// Produces a new tree; ordering is preserved and no node is duplicated.
pub fn filter_navigation(items: &[NavItem], role: Role, permissions: &PermissionSet) -> Vec<NavItem> {
    items
        .iter()
        .filter_map(|item| filter_item(item, role, permissions))
        .collect()
}

fn filter_item(item: &NavItem, role: Role, permissions: &PermissionSet) -> Option<NavItem> {
    if let Some(required) = item.required_role {
        if required != role {
            return None;
        }
    }

    if let Some(required) = &item.required_permission {
        if !is_allowed(role, permissions, required) {
            return None;
        }
    }

    let children = filter_navigation(&item.children, role, permissions);

    // A pathless header with nothing left under it links nowhere; drop it.
    if item.path.is_none() && children.is_empty() {
        return None;
    }

    Some(NavItem {
        name: item.name.clone(),
        path: item.path.clone(),
        required_role: item.required_role,
        required_permission: item.required_permission.clone(),
        children,
    })
}

/// The platform's static navigation tree.
pub fn default_navigation() -> Vec<NavItem> {
    vec![
        NavItem::link("Dashboard", "/dashboard"),
        NavItem::link("Staff", "/staff")
            .requires("staff:read")
            .with_children(vec![
                NavItem::link("All Staff", "/staff").requires("staff:read"),
                NavItem::link("Add Staff", "/staff/create").requires("staff:create"),
                NavItem::link("Departments", "/departments").requires("departments:read"),
            ]),
        NavItem::link("Customers", "/customers")
            .requires("customers:read")
            .with_children(vec![
                NavItem::link("Add Customer", "/customers/create").requires("customers:create"),
            ]),
        NavItem::link("Suppliers", "/suppliers").requires("suppliers:read"),
        NavItem::section("Catalog").with_children(vec![
            NavItem::link("Services", "/services").requires("services:read"),
            NavItem::link("Packages", "/packages").requires("packages:read"),
        ]),
        NavItem::link("Inventory", "/inventory")
            .requires("inventory:read")
            .with_children(vec![
                NavItem::link("Items", "/inventory/items").requires("inventory:read"),
                NavItem::link("Low Stock", "/inventory/low-stock").requires("inventory:read"),
            ]),
        NavItem::section("Finance").with_children(vec![
            NavItem::link("Wallets", "/wallets").requires("wallets:read"),
            NavItem::link("Expenses", "/expenses").requires("expenses:read"),
        ]),
        NavItem::link("Purchase Orders", "/purchase-orders").requires("purchasing:read"),
        NavItem::link("Point of Sale", "/pos").requires("pos:read"),
        NavItem::link("Business Settings", "/business/settings")
            .requires("business:settings:read"),
        NavItem::link("Security", "/security")
            .only_for(Role::Owner)
            .requires("security:read"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> PermissionSet {
        list.iter().copied().collect()
    }

    fn names(items: &[NavItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn unrestricted_nodes_always_pass() {
        let tree = vec![NavItem::link("Dashboard", "/dashboard")];
        let out = filter_navigation(&tree, Role::Cashier, &PermissionSet::new());
        assert_eq!(names(&out), ["Dashboard"]);
    }

    #[test]
    fn staff_create_pruned_without_grant() {
        // Worked example from the access policy: staff:read keeps the parent,
        // staff:create prunes the child, parent survives with empty children.
        let tree = vec![
            NavItem::link("Staff", "/staff")
                .requires("staff:read")
                .with_children(vec![
                    NavItem::link("Add", "/staff/create").requires("staff:create"),
                ]),
        ];

        let out = filter_navigation(&tree, Role::Staff, &perms(&["staff:read"]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Staff");
        assert!(out[0].children.is_empty());
    }

    #[test]
    fn staff_create_kept_with_grant_wildcard_or_owner() {
        let tree = vec![NavItem::link("Add", "/staff/create").requires("staff:create")];

        for (role, grants) in [
            (Role::Staff, vec!["staff:create"]),
            (Role::Cashier, vec!["*"]),
            (Role::Owner, vec![]),
        ] {
            let grant_set: PermissionSet = grants.iter().copied().collect();
            let out = filter_navigation(&tree, role, &grant_set);
            assert_eq!(out.len(), 1, "role={role}");
        }
    }

    #[test]
    fn pathless_parent_with_no_surviving_children_is_dropped() {
        let tree = vec![NavItem::section("Finance").with_children(vec![
            NavItem::link("Wallets", "/wallets").requires("wallets:read"),
        ])];

        let out = filter_navigation(&tree, Role::Staff, &PermissionSet::new());
        assert!(out.is_empty());
    }

    #[test]
    fn role_gate_is_exact_match() {
        let tree = vec![NavItem::link("Security", "/security").only_for(Role::Owner)];
        assert!(filter_navigation(&tree, Role::Admin, &perms(&["*"])).is_empty());
        assert_eq!(
            filter_navigation(&tree, Role::Owner, &PermissionSet::new()).len(),
            1
        );
    }

    #[test]
    fn owner_sees_everything_except_ungranted_settings() {
        let out = filter_navigation(&default_navigation(), Role::Owner, &PermissionSet::new());
        let top = names(&out);
        assert!(top.contains(&"Staff"));
        assert!(top.contains(&"Point of Sale"));
        assert!(top.contains(&"Security"));
        // business:settings:read falls under the carve-out; with no grants,
        // even the owner loses the settings entry.
        assert!(!top.contains(&"Business Settings"));

        let granted = filter_navigation(
            &default_navigation(),
            Role::Owner,
            &perms(&["business:settings:read"]),
        );
        assert!(names(&granted).contains(&"Business Settings"));
    }

    #[test]
    fn ordering_is_preserved() {
        let out = filter_navigation(&default_navigation(), Role::Manager, &perms(&["*"]));
        let top = names(&out);
        let staff_pos = top.iter().position(|n| *n == "Staff").unwrap();
        let pos_pos = top.iter().position(|n| *n == "Point of Sale").unwrap();
        assert!(staff_pos < pos_pos);
    }

    #[test]
    fn input_tree_is_untouched() {
        let tree = default_navigation();
        let before = tree.clone();
        let _ = filter_navigation(&tree, Role::Cashier, &PermissionSet::new());
        assert_eq!(tree, before);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_permission() -> impl Strategy<Value = Option<Permission>> {
            prop_oneof![
                Just(None),
                Just(Some(Permission::new("staff:read"))),
                Just(Some(Permission::new("staff:create"))),
                Just(Some(Permission::new("pos:checkout"))),
                Just(Some(Permission::new("business:settings:update"))),
            ]
        }

        fn arb_role_gate() -> impl Strategy<Value = Option<Role>> {
            prop_oneof![
                Just(None),
                Just(Some(Role::Owner)),
                Just(Some(Role::Manager)),
                Just(Some(Role::Cashier)),
            ]
        }

        fn arb_nav_item() -> impl Strategy<Value = NavItem> {
            let leaf = (
                "[a-z]{1,8}",
                proptest::option::of("/[a-z]{1,8}"),
                arb_role_gate(),
                arb_permission(),
            )
                .prop_map(|(name, path, required_role, required_permission)| NavItem {
                    name,
                    path,
                    required_role,
                    required_permission,
                    children: Vec::new(),
                });

            leaf.prop_recursive(3, 24, 4, |inner| {
                (
                    "[a-z]{1,8}",
                    proptest::option::of("/[a-z]{1,8}"),
                    arb_role_gate(),
                    arb_permission(),
                    proptest::collection::vec(inner, 0..4),
                )
                    .prop_map(|(name, path, required_role, required_permission, children)| {
                        NavItem {
                            name,
                            path,
                            required_role,
                            required_permission,
                            children,
                        }
                    })
            })
        }

        fn arb_caller() -> impl Strategy<Value = (Role, PermissionSet)> {
            let role = prop_oneof![
                Just(Role::Owner),
                Just(Role::Admin),
                Just(Role::Manager),
                Just(Role::Staff),
                Just(Role::Cashier),
            ];
            let grants = proptest::collection::hash_set(
                prop_oneof![
                    Just("*"),
                    Just("staff:read"),
                    Just("staff:create"),
                    Just("pos:checkout"),
                    Just("business:settings:update"),
                ],
                0..4,
            )
            .prop_map(|set| set.into_iter().collect::<PermissionSet>());
            (role, grants)
        }

        proptest! {
            /// Filtering is idempotent: an already-filtered tree is a fixpoint.
            #[test]
            fn filter_is_idempotent(
                tree in proptest::collection::vec(arb_nav_item(), 0..6),
                (role, grants) in arb_caller(),
            ) {
                let once = filter_navigation(&tree, role, &grants);
                let twice = filter_navigation(&once, role, &grants);
                prop_assert_eq!(once, twice);
            }

            /// Every surviving node passes its own gates, and no pathless
            /// childless node survives.
            #[test]
            fn output_nodes_are_visible(
                tree in proptest::collection::vec(arb_nav_item(), 0..6),
                (role, grants) in arb_caller(),
            ) {
                fn check(items: &[NavItem], role: Role, grants: &PermissionSet) {
                    for item in items {
                        if let Some(r) = item.required_role {
                            assert_eq!(r, role);
                        }
                        if let Some(p) = &item.required_permission {
                            assert!(is_allowed(role, grants, p));
                        }
                        assert!(item.path.is_some() || !item.children.is_empty());
                        check(&item.children, role, grants);
                    }
                }

                let out = filter_navigation(&tree, role, &grants);
                check(&out, role, &grants);
            }
        }
    }
}
