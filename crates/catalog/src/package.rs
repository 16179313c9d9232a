use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DomainError, DomainResult, Entity, Money, PackageId, ServiceId};

/// A service included in a package, with a session count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLine {
    pub service_id: ServiceId,
    pub sessions: u32,
}

/// A bundle of services sold at its own price, valid for a fixed number of
/// days after purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub business_id: BusinessId,
    pub name: String,
    pub lines: Vec<PackageLine>,
    pub price: Money,
    pub validity_days: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Package {
    pub fn create(
        business_id: BusinessId,
        id: PackageId,
        name: String,
        lines: Vec<PackageLine>,
        price: Money,
        validity_days: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if lines.is_empty() {
            return Err(DomainError::validation(
                "package must include at least one service",
            ));
        }
        if lines.iter().any(|l| l.sessions == 0) {
            return Err(DomainError::validation("session count must be positive"));
        }
        if validity_days == 0 {
            return Err(DomainError::validation("validity must be positive"));
        }
        Ok(Self {
            id,
            business_id,
            name,
            lines,
            price,
            validity_days,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn reprice(&mut self, price: Money, now: DateTime<Utc>) -> DomainResult<()> {
        if price.currency() != self.price.currency() {
            return Err(DomainError::invariant(
                "package price currency cannot change",
            ));
        }
        self.price = price;
        self.updated_at = now;
        Ok(())
    }

    pub fn retire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::conflict("package is already retired"));
        }
        self.active = false;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Package {
    type Id = PackageId;

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
    use bizgrid_core::Currency;

    fn line() -> PackageLine {
        PackageLine {
            service_id: ServiceId::new(),
            sessions: 5,
        }
    }

    #[test]
    fn create_requires_lines_and_validity() {
        let price = Money::from_minor(20_000, Currency::Ngn).unwrap();
        assert!(
            Package::create(
                BusinessId::new(),
                PackageId::new(),
                "Starter".to_string(),
                vec![],
                price,
                30,
                Utc::now(),
            )
            .is_err()
        );
        assert!(
            Package::create(
                BusinessId::new(),
                PackageId::new(),
                "Starter".to_string(),
                vec![line()],
                price,
                0,
                Utc::now(),
            )
            .is_err()
        );
        assert!(
            Package::create(
                BusinessId::new(),
                PackageId::new(),
                "Starter".to_string(),
                vec![line()],
                price,
                30,
                Utc::now(),
            )
            .is_ok()
        );
    }

    #[test]
    fn zero_session_lines_rejected() {
        let price = Money::zero(Currency::Usd);
        let bad = PackageLine {
            service_id: ServiceId::new(),
            sessions: 0,
        };
        assert!(
            Package::create(
                BusinessId::new(),
                PackageId::new(),
                "Starter".to_string(),
                vec![bad],
                price,
                30,
                Utc::now(),
            )
            .is_err()
        );
    }
}
