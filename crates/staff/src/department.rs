use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DepartmentId, DomainError, DomainResult, Entity};

/// An organizational unit. Departments nest via `parent`; the referenced
/// parent must exist in the same business (checked at the API layer against
/// the store) and a department can never be its own parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub business_id: BusinessId,
    pub name: String,
    pub parent: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    pub fn create(
        business_id: BusinessId,
        id: DepartmentId,
        name: String,
        parent: Option<DepartmentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if parent == Some(id) {
            return Err(DomainError::invariant("department cannot be its own parent"));
        }
        Ok(Self {
            id,
            business_id,
            name,
            parent,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: String, now: DateTime<Utc>) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        self.name = name;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_parent(
        &mut self,
        parent: Option<DepartmentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if parent == Some(self.id) {
            return Err(DomainError::invariant("department cannot be its own parent"));
        }
        self.parent = parent;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Department {
    type Id = DepartmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn business_id(&self) -> BusinessId {
        self.business_id
    }
}
