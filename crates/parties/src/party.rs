use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DomainError, DomainResult, Entity, PartyId};

/// Whether a party buys from the business or sells to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Supplier,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    #[default]
    Active,
    Archived,
}

/// Contact details; both fields optional, email validated when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    fn validate(&self) -> DomainResult<()> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
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

/// A customer or supplier of a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub business_id: BusinessId,
    pub kind: PartyKind,
    pub name: String,
    pub contact: ContactInfo,
    pub status: PartyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Party {
    pub fn register(
        business_id: BusinessId,
        id: PartyId,
        kind: PartyKind,
        name: String,
        contact: ContactInfo,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        contact.validate()?;

        Ok(Self {
            id,
            business_id,
            kind,
            name,
            contact,
            status: PartyStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_details(
        &mut self,
        name: Option<String>,
        contact: Option<ContactInfo>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status == PartyStatus::Archived {
            return Err(DomainError::conflict("party is archived"));
        }
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(contact) = contact {
            contact.validate()?;
            self.contact = contact;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == PartyStatus::Archived {
            return Err(DomainError::conflict("party is already archived"));
        }
        self.status = PartyStatus::Archived;
        self.updated_at = now;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == PartyStatus::Active
    }
}

impl Entity for Party {
    type Id = PartyId;

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

    fn register(kind: PartyKind, name: &str, email: Option<&str>) -> DomainResult<Party> {
        Party::register(
            BusinessId::new(),
            PartyId::new(),
            kind,
            name.to_string(),
            ContactInfo {
                email: email.map(str::to_string),
                phone: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn register_customer() {
        let party = register(PartyKind::Customer, "Ada's Bakery", Some("ada@example.com")).unwrap();
        assert_eq!(party.kind, PartyKind::Customer);
        assert!(party.is_active());
    }

    #[test]
    fn empty_name_rejected() {
        assert!(register(PartyKind::Supplier, "  ", None).is_err());
    }

    #[test]
    fn malformed_email_rejected() {
        assert!(register(PartyKind::Customer, "Ada", Some("not-an-email")).is_err());
        assert!(register(PartyKind::Customer, "Ada", Some("a@b")).is_err());
    }

    #[test]
    fn archived_party_cannot_be_updated() {
        let mut party = register(PartyKind::Customer, "Ada", None).unwrap();
        party.archive(Utc::now()).unwrap();
        let err = party
            .update_details(Some("Eve".to_string()), None, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn double_archive_is_a_conflict() {
        let mut party = register(PartyKind::Supplier, "Acme", None).unwrap();
        party.archive(Utc::now()).unwrap();
        assert!(party.archive(Utc::now()).is_err());
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let mut party = register(PartyKind::Customer, "Ada", Some("ada@example.com")).unwrap();
        party
            .update_details(Some("Ada Lovelace".to_string()), None, Utc::now())
            .unwrap();
        assert_eq!(party.name, "Ada Lovelace");
        assert_eq!(party.contact.email.as_deref(), Some("ada@example.com"));
    }
}
