use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{
    BusinessId, DomainError, DomainResult, Entity, ItemId, Money, PackageId, PartyId, SaleId,
    ServiceId, WalletId,
};

/// What a sale line points at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum SaleLineRef {
    Item(ItemId),
    Service(ServiceId),
    Package(PackageId),
}

/// One line of a sale, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub reference: SaleLineRef,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// How the customer paid. Wallet payments credit the named wallet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "method", content = "wallet_id")]
pub enum PaymentMethod {
    Cash,
    Card,
    Wallet(WalletId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
    Refunded,
}

/// A completed point-of-sale transaction.
///
/// # Invariants
/// - At least one line; every quantity positive.
/// - All line prices and the discount share one currency.
/// - `total = Σ quantity × unit_price − discount`, and the discount may not
///   exceed the subtotal.
/// - Refund happens at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub business_id: BusinessId,
    pub customer_id: Option<PartyId>,
    pub lines: Vec<SaleLine>,
    pub discount: Money,
    pub total: Money,
    pub payment: PaymentMethod,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn checkout(
        business_id: BusinessId,
        id: SaleId,
        customer_id: Option<PartyId>,
        lines: Vec<SaleLine>,
        discount: Money,
        payment: PaymentMethod,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("sale must have at least one line"));
        }

        let mut subtotal = Money::zero(discount.currency());
        for line in &lines {
            if line.quantity <= 0 {
                return Err(DomainError::validation("quantity must be positive"));
            }
            subtotal = subtotal.checked_add(&line.line_total()?)?;
        }

        // `checked_sub` also rejects a discount larger than the subtotal.
        let total = subtotal.checked_sub(&discount)?;

        Ok(Self {
            id,
            business_id,
            customer_id,
            lines,
            discount,
            total,
            payment,
            status: SaleStatus::Completed,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn refund(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == SaleStatus::Refunded {
            return Err(DomainError::conflict("sale is already refunded"));
        }
        self.status = SaleStatus::Refunded;
        self.updated_at = now;
        Ok(())
    }

    /// Item lines with quantities, for stock movements at checkout/refund.
    pub fn item_movements(&self) -> impl Iterator<Item = (ItemId, i64)> + '_ {
        self.lines.iter().filter_map(|line| match line.reference {
            SaleLineRef::Item(item_id) => Some((item_id, line.quantity)),
            _ => None,
        })
    }
}

impl Entity for Sale {
    type Id = SaleId;

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

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, Currency::Usd).unwrap()
    }

    fn item_line(quantity: i64, unit_minor: i64) -> SaleLine {
        SaleLine {
            reference: SaleLineRef::Item(ItemId::new()),
            description: "Soap".to_string(),
            quantity,
            unit_price: usd(unit_minor),
        }
    }

    fn service_line() -> SaleLine {
        SaleLine {
            reference: SaleLineRef::Service(ServiceId::new()),
            description: "Wash".to_string(),
            quantity: 1,
            unit_price: usd(1500),
        }
    }

    #[test]
    fn total_is_subtotal_minus_discount() {
        let sale = Sale::checkout(
            BusinessId::new(),
            SaleId::new(),
            None,
            vec![item_line(2, 500), service_line()],
            usd(300),
            PaymentMethod::Cash,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(sale.total.minor(), 2 * 500 + 1500 - 300);
    }

    #[test]
    fn empty_sale_rejected() {
        assert!(
            Sale::checkout(
                BusinessId::new(),
                SaleId::new(),
                None,
                vec![],
                Money::zero(Currency::Usd),
                PaymentMethod::Cash,
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn discount_cannot_exceed_subtotal() {
        assert!(
            Sale::checkout(
                BusinessId::new(),
                SaleId::new(),
                None,
                vec![item_line(1, 100)],
                usd(101),
                PaymentMethod::Cash,
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn mixed_currency_lines_rejected() {
        let mut eur_line = item_line(1, 100);
        eur_line.unit_price = Money::from_minor(100, Currency::Eur).unwrap();
        assert!(
            Sale::checkout(
                BusinessId::new(),
                SaleId::new(),
                None,
                vec![item_line(1, 100), eur_line],
                Money::zero(Currency::Usd),
                PaymentMethod::Cash,
                Utc::now(),
            )
            .is_err()
        );
    }

    #[test]
    fn refund_only_once() {
        let mut sale = Sale::checkout(
            BusinessId::new(),
            SaleId::new(),
            Some(PartyId::new()),
            vec![item_line(1, 100)],
            Money::zero(Currency::Usd),
            PaymentMethod::Wallet(WalletId::new()),
            Utc::now(),
        )
        .unwrap();
        sale.refund(Utc::now()).unwrap();
        assert!(sale.refund(Utc::now()).is_err());
    }

    #[test]
    fn item_movements_skip_services() {
        let sale = Sale::checkout(
            BusinessId::new(),
            SaleId::new(),
            None,
            vec![item_line(3, 100), service_line()],
            Money::zero(Currency::Usd),
            PaymentMethod::Card,
            Utc::now(),
        )
        .unwrap();
        let moves: Vec<_> = sale.item_movements().collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].1, 3);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Checkout either fails or produces a total equal to the line
            /// sum minus the discount, never negative.
            #[test]
            fn totals_are_consistent(
                quantities in proptest::collection::vec((1i64..20, 1i64..5_000), 1..8),
                discount_minor in 0i64..10_000,
            ) {
                let lines: Vec<SaleLine> = quantities
                    .iter()
                    .map(|&(quantity, unit)| item_line(quantity, unit))
                    .collect();
                let expected: i64 = quantities.iter().map(|&(q, u)| q * u).sum();

                let result = Sale::checkout(
                    BusinessId::new(),
                    SaleId::new(),
                    None,
                    lines,
                    usd(discount_minor),
                    PaymentMethod::Cash,
                    Utc::now(),
                );

                if discount_minor <= expected {
                    let sale = result.unwrap();
                    prop_assert_eq!(sale.total.minor(), expected - discount_minor);
                    prop_assert!(sale.total.minor() >= 0);
                } else {
                    prop_assert!(result.is_err());
                }
            }
        }
    }
}
