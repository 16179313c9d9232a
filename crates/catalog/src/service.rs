use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DomainError, DomainResult, Entity, Money, ServiceId};

/// A sellable service (haircut, consultation, repair, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub business_id: BusinessId,
    pub name: String,
    pub price: Money,
    pub duration_minutes: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn create(
        business_id: BusinessId,
        id: ServiceId,
        name: String,
        price: Money,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if duration_minutes == 0 {
            return Err(DomainError::validation("duration must be positive"));
        }
        Ok(Self {
            id,
            business_id,
            name,
            price,
            duration_minutes,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(
        &mut self,
        name: Option<String>,
        price: Option<Money>,
        duration_minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(price) = price {
            if price.currency() != self.price.currency() {
                return Err(DomainError::invariant(
                    "service price currency cannot change",
                ));
            }
            self.price = price;
        }
        if let Some(minutes) = duration_minutes {
            if minutes == 0 {
                return Err(DomainError::validation("duration must be positive"));
            }
            self.duration_minutes = minutes;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn retire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.active {
            return Err(DomainError::conflict("service is already retired"));
        }
        self.active = false;
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Service {
    type Id = ServiceId;

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

    fn service() -> Service {
        Service::create(
            BusinessId::new(),
            ServiceId::new(),
            "Deep Clean".to_string(),
            Money::from_minor(4500, Currency::Usd).unwrap(),
            90,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_validates_name_and_duration() {
        assert!(
            Service::create(
                BusinessId::new(),
                ServiceId::new(),
                " ".to_string(),
                Money::zero(Currency::Usd),
                30,
                Utc::now(),
            )
            .is_err()
        );
        assert!(
            Service::create(
                BusinessId::new(),
                ServiceId::new(),
                "Trim".to_string(),
                Money::zero(Currency::Usd),
                0,
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn price_currency_is_fixed() {
        let mut svc = service();
        let eur = Money::from_minor(4000, Currency::Eur).unwrap();
        assert!(svc.update(None, Some(eur), None, Utc::now()).is_err());
        let usd = Money::from_minor(5000, Currency::Usd).unwrap();
        assert!(svc.update(None, Some(usd), None, Utc::now()).is_ok());
    }

    #[test]
    fn retire_is_one_way_per_call() {
        let mut svc = service();
        svc.retire(Utc::now()).unwrap();
        assert!(svc.retire(Utc::now()).is_err());
    }
}
