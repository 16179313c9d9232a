use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_auth::Role;
use bizgrid_core::{BusinessId, DepartmentId, DomainError, DomainResult, Entity, StaffId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    #[default]
    Active,
    Inactive,
}

/// A staff member of a business.
///
/// # Invariants
/// - Belongs to exactly one business; `business_id` is immutable.
/// - Email is unique per business (enforced at the API layer against the
///   store; uniqueness across tenants is not required).
/// - Inactive staff cannot have their role or department changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub business_id: BusinessId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<DepartmentId>,
    pub status: StaffStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffMember {
    pub fn hire(
        business_id: BusinessId,
        id: StaffId,
        name: String,
        email: String,
        role: Role,
        department: Option<DepartmentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Self::validate_email(&email)?;
        if role == Role::Owner {
            // The owner seat is tied to the business record, not hired in.
            return Err(DomainError::invariant("staff cannot be hired as owner"));
        }

        Ok(Self {
            id,
            business_id,
            name,
            email,
            role,
            department,
            status: StaffStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_email(email: &str) -> DomainResult<()> {
        let Some((local, domain)) = email.split_once('@') else {
            return Err(DomainError::validation("email must contain '@'"));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::validation("malformed email address"));
        }
        Ok(())
    }

    fn ensure_active(&self) -> DomainResult<()> {
        if self.status != StaffStatus::Active {
            return Err(DomainError::conflict("staff member is inactive"));
        }
        Ok(())
    }

    pub fn update_details(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_active()?;
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(email) = email {
            Self::validate_email(&email)?;
            self.email = email;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn change_role(&mut self, role: Role, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;
        if role == Role::Owner {
            return Err(DomainError::invariant("staff cannot be promoted to owner"));
        }
        self.role = role;
        self.updated_at = now;
        Ok(())
    }

    pub fn assign_department(
        &mut self,
        department: Option<DepartmentId>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_active()?;
        self.department = department;
        self.updated_at = now;
        Ok(())
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_active()?;
        self.status = StaffStatus::Inactive;
        self.updated_at = now;
        Ok(())
    }

    pub fn reactivate(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == StaffStatus::Active {
            return Err(DomainError::conflict("staff member is already active"));
        }
        self.status = StaffStatus::Active;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for StaffMember {
    type Id = StaffId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn business_id(&self) -> BusinessId {
        self.business_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hire(role: Role) -> DomainResult<StaffMember> {
        StaffMember::hire(
            BusinessId::new(),
            StaffId::new(),
            "Grace Hopper".to_string(),
            "grace@example.com".to_string(),
            role,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn hire_staff_member() {
        let member = hire(Role::Staff).unwrap();
        assert_eq!(member.status, StaffStatus::Active);
    }

    #[test]
    fn cannot_hire_an_owner() {
        assert!(hire(Role::Owner).is_err());
    }

    #[test]
    fn cannot_promote_to_owner() {
        let mut member = hire(Role::Staff).unwrap();
        assert!(member.change_role(Role::Owner, Utc::now()).is_err());
        assert!(member.change_role(Role::Manager, Utc::now()).is_ok());
    }

    #[test]
    fn inactive_members_are_frozen() {
        let mut member = hire(Role::Cashier).unwrap();
        member.deactivate(Utc::now()).unwrap();
        assert!(member.change_role(Role::Staff, Utc::now()).is_err());
        assert!(
            member
                .assign_department(Some(DepartmentId::new()), Utc::now())
                .is_err()
        );
        assert!(member.deactivate(Utc::now()).is_err());

        member.reactivate(Utc::now()).unwrap();
        assert!(member.change_role(Role::Staff, Utc::now()).is_ok());
    }

    #[test]
    fn bad_email_rejected_on_hire_and_update() {
        let err = StaffMember::hire(
            BusinessId::new(),
            StaffId::new(),
            "Grace".to_string(),
            "grace.example.com".to_string(),
            Role::Staff,
            None,
            Utc::now(),
        );
        assert!(err.is_err());

        let mut member = hire(Role::Staff).unwrap();
        assert!(
            member
                .update_details(None, Some("plainly-wrong".to_string()), Utc::now())
                .is_err()
        );
    }
}
