use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DomainError, DomainResult, Entity, ExpenseId, Money, WalletId};

/// A recorded business expense.
///
/// Expenses are immutable once recorded; corrections are new records. When a
/// funding wallet is given, the API layer withdraws from it in the same
/// operation that records the expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub business_id: BusinessId,
    pub category: String,
    pub amount: Money,
    pub incurred_on: NaiveDate,
    pub note: Option<String>,
    pub wallet_id: Option<WalletId>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn record(
        business_id: BusinessId,
        id: ExpenseId,
        category: String,
        amount: Money,
        incurred_on: NaiveDate,
        note: Option<String>,
        wallet_id: Option<WalletId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if amount.is_zero() {
            return Err(DomainError::validation("amount cannot be zero"));
        }
        Ok(Self {
            id,
            business_id,
            category,
            amount,
            incurred_on,
            note,
            wallet_id,
            created_at: now,
        })
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

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

    #[test]
    fn record_validates_category_and_amount() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(
            Expense::record(
                BusinessId::new(),
                ExpenseId::new(),
                "".to_string(),
                Money::from_minor(500, Currency::Usd).unwrap(),
                date,
                None,
                None,
                Utc::now(),
            )
            .is_err()
        );
        assert!(
            Expense::record(
                BusinessId::new(),
                ExpenseId::new(),
                "rent".to_string(),
                Money::zero(Currency::Usd),
                date,
                None,
                None,
                Utc::now(),
            )
            .is_err()
        );
        assert!(
            Expense::record(
                BusinessId::new(),
                ExpenseId::new(),
                "rent".to_string(),
                Money::from_minor(120_000, Currency::Usd).unwrap(),
                date,
                Some("August".to_string()),
                Some(WalletId::new()),
                Utc::now(),
            )
            .is_ok()
        );
    }
}
