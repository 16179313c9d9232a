use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, Currency, DomainError, DomainResult};

/// Profile and settings of a business (the tenant itself).
///
/// There is exactly one profile per business; it is created when the tenant
/// is provisioned and edited through the settings endpoints, which sit behind
/// the `business:settings:*` permissions (the owner carve-out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: BusinessId,
    pub name: String,
    pub default_currency: Currency,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    pub fn provision(
        id: BusinessId,
        name: String,
        default_currency: Currency,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            default_currency,
            contact_email: None,
            contact_phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_settings(
        &mut self,
        name: Option<String>,
        default_currency: Option<Currency>,
        contact_email: Option<Option<String>>,
        contact_phone: Option<Option<String>>,
        address: Option<Option<String>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(currency) = default_currency {
            self.default_currency = currency;
        }
        if let Some(email) = contact_email {
            self.contact_email = email;
        }
        if let Some(phone) = contact_phone {
            self.contact_phone = phone;
        }
        if let Some(address) = address {
            self.address = address;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_rejects_empty_name() {
        assert!(
            BusinessProfile::provision(
                BusinessId::new(),
                " ".to_string(),
                Currency::Usd,
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn settings_update_is_partial() {
        let mut profile = BusinessProfile::provision(
            BusinessId::new(),
            "Sunrise Salon".to_string(),
            Currency::Ngn,
            Utc::now(),
        )
        .unwrap();

        profile
            .update_settings(
                None,
                Some(Currency::Usd),
                Some(Some("hello@sunrise.example".to_string())),
                None,
                None,
                Utc::now(),
            )
            .unwrap();

        assert_eq!(profile.name, "Sunrise Salon");
        assert_eq!(profile.default_currency, Currency::Usd);
        assert!(profile.contact_email.is_some());
    }
}
