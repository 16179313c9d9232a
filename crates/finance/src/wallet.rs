use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, Currency, DomainError, DomainResult, Entity, Money, WalletId};

/// A money pot owned by a business (till, bank account, mobile money).
///
/// # Invariants
/// - Balance never goes negative (no overdraft).
/// - Deposits and withdrawals must match the wallet currency.
/// - Zero-amount movements are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub business_id: BusinessId,
    pub name: String,
    pub currency: Currency,
    pub balance_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn open(
        business_id: BusinessId,
        id: WalletId,
        name: String,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            business_id,
            name,
            currency,
            balance_minor: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn balance(&self) -> Money {
        // Balance is maintained non-negative, so this cannot fail.
        Money::from_minor(self.balance_minor, self.currency)
            .unwrap_or_else(|_| Money::zero(self.currency))
    }

    fn ensure_movement(&self, amount: &Money) -> DomainResult<()> {
        if amount.currency() != self.currency {
            return Err(DomainError::invariant(format!(
                "wallet is {}, movement is {}",
                self.currency,
                amount.currency()
            )));
        }
        if amount.is_zero() {
            return Err(DomainError::validation("amount cannot be zero"));
        }
        Ok(())
    }

    pub fn deposit(&mut self, amount: Money, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_movement(&amount)?;
        self.balance_minor = self
            .balance_minor
            .checked_add(amount.minor())
            .ok_or_else(|| DomainError::invariant("balance overflow"))?;
        self.updated_at = now;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Money, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_movement(&amount)?;
        if amount.minor() > self.balance_minor {
            return Err(DomainError::invariant("insufficient funds"));
        }
        self.balance_minor -= amount.minor();
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Wallet {
    type Id = WalletId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn business_id(&self) -> BusinessId {
        self.business_id
    }
}
