use bizgrid_auth::{AuthzError, Permission, PermissionSet, Role, authorize};
use bizgrid_core::{BusinessId, UserId};

/// Business (tenant) context for a request.
///
/// Immutable, derived from the token, and present for all protected routes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BusinessContext {
    business_id: BusinessId,
}

impl BusinessContext {
    pub fn new(business_id: BusinessId) -> Self {
        Self { business_id }
    }

    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }
}

/// Principal context for a request: authenticated identity, role tier, and
/// the flat permission grants from the token.
#[derive(Debug, Clone)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
    permissions: PermissionSet,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, role: Role, permissions: PermissionSet) -> Self {
        Self {
            user_id,
            role,
            permissions,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Guard a handler on a permission; intended for `?` at the top of the
    /// handler, before any storage access.
    pub fn require(&self, permission: &'static str) -> Result<(), AuthzError> {
        authorize(self.role, &self.permissions, &Permission::new(permission))
    }
}
