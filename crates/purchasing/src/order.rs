use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{
    BusinessId, DomainError, DomainResult, Entity, ItemId, Money, PartyId, PurchaseOrderId,
};

/// Purchase order status lifecycle.
///
/// `Draft → Submitted → PartiallyReceived → Received`, with `Cancelled`
/// reachable from any state before the order is fully received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    PartiallyReceived,
    Received,
    Cancelled,
}

/// One ordered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub quantity_ordered: i64,
    pub quantity_received: i64,
    pub unit_cost: Money,
}

impl OrderLine {
    pub fn outstanding(&self) -> i64 {
        self.quantity_ordered - self.quantity_received
    }
}

/// Quantities accepted for a line during a delivery. A receipt beyond the
/// line's outstanding quantity is rejected as over-delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub line_no: u32,
    pub quantity: i64,
}

/// A purchase order against a supplier.
///
/// # Invariants
/// - Lines are mutable only while the order is in `Draft`.
/// - Submission requires at least one line.
/// - `quantity_received` never exceeds `quantity_ordered` on any line.
/// - A fully received order cannot be cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub business_id: BusinessId,
    pub supplier_id: PartyId,
    pub status: PurchaseOrderStatus,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn draft(
        business_id: BusinessId,
        id: PurchaseOrderId,
        supplier_id: PartyId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            business_id,
            supplier_id,
            status: PurchaseOrderStatus::Draft,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a line. Only allowed in `Draft`.
    pub fn add_line(
        &mut self,
        item_id: ItemId,
        quantity: i64,
        unit_cost: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<u32> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::conflict("lines can only change in draft"));
        }
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if self.lines.iter().any(|l| l.item_id == item_id) {
            return Err(DomainError::conflict("item already on this order"));
        }

        let line_no = self.lines.len() as u32 + 1;
        self.lines.push(OrderLine {
            line_no,
            item_id,
            quantity_ordered: quantity,
            quantity_received: 0,
            unit_cost,
        });
        self.updated_at = now;
        Ok(line_no)
    }

    /// Remove a draft line by number. Remaining lines keep their numbers.
    pub fn remove_line(&mut self, line_no: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::conflict("lines can only change in draft"));
        }
        let before = self.lines.len();
        self.lines.retain(|l| l.line_no != line_no);
        if self.lines.len() == before {
            return Err(DomainError::not_found());
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn submit(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::conflict("only draft orders can be submitted"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::invariant("cannot submit an empty order"));
        }
        self.status = PurchaseOrderStatus::Submitted;
        self.updated_at = now;
        Ok(())
    }

    /// Record a delivery. Moves to `PartiallyReceived` or `Received`
    /// depending on what remains outstanding afterwards.
    pub fn receive(&mut self, receipts: &[Receipt], now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            PurchaseOrderStatus::Submitted | PurchaseOrderStatus::PartiallyReceived => {}
            _ => {
                return Err(DomainError::conflict(
                    "order is not open for receiving",
                ));
            }
        }
        if receipts.is_empty() {
            return Err(DomainError::validation("receipt cannot be empty"));
        }

        // Validate the whole receipt before mutating anything.
        for (i, receipt) in receipts.iter().enumerate() {
            if receipts[..i].iter().any(|r| r.line_no == receipt.line_no) {
                return Err(DomainError::validation(format!(
                    "line {} appears twice in one receipt",
                    receipt.line_no
                )));
            }
        }
        for receipt in receipts {
            let line = self
                .lines
                .iter()
                .find(|l| l.line_no == receipt.line_no)
                .ok_or(DomainError::NotFound)?;
            if receipt.quantity <= 0 {
                return Err(DomainError::validation("received quantity must be positive"));
            }
            if receipt.quantity > line.outstanding() {
                return Err(DomainError::invariant(format!(
                    "line {} over-delivered: {} outstanding, {} received",
                    line.line_no,
                    line.outstanding(),
                    receipt.quantity
                )));
            }
        }

        for receipt in receipts {
            let line = self
                .lines
                .iter_mut()
                .find(|l| l.line_no == receipt.line_no)
                .expect("validated above");
            line.quantity_received += receipt.quantity;
        }

        self.status = if self.lines.iter().all(|l| l.outstanding() == 0) {
            PurchaseOrderStatus::Received
        } else {
            PurchaseOrderStatus::PartiallyReceived
        };
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            PurchaseOrderStatus::Received => {
                Err(DomainError::conflict("fully received orders cannot be cancelled"))
            }
            PurchaseOrderStatus::Cancelled => {
                Err(DomainError::conflict("order is already cancelled"))
            }
            _ => {
                self.status = PurchaseOrderStatus::Cancelled;
                self.updated_at = now;
                Ok(())
            }
        }
    }

    /// Total ordered value across lines.
    pub fn total(&self) -> DomainResult<Option<Money>> {
        let mut iter = self.lines.iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let mut total = first.unit_cost.checked_mul(first.quantity_ordered)?;
        for line in iter {
            total = total.checked_add(&line.unit_cost.checked_mul(line.quantity_ordered)?)?;
        }
        Ok(Some(total))
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

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

    fn draft_with_line(quantity: i64) -> PurchaseOrder {
        let mut po = PurchaseOrder::draft(
            BusinessId::new(),
            PurchaseOrderId::new(),
            PartyId::new(),
            Utc::now(),
        );
        po.add_line(ItemId::new(), quantity, usd(250), Utc::now())
            .unwrap();
        po
    }

    #[test]
    fn submit_requires_lines() {
        let mut po = PurchaseOrder::draft(
            BusinessId::new(),
            PurchaseOrderId::new(),
            PartyId::new(),
            Utc::now(),
        );
        assert!(po.submit(Utc::now()).is_err());
    }

    #[test]
    fn lines_frozen_after_submit() {
        let mut po = draft_with_line(10);
        po.submit(Utc::now()).unwrap();
        assert!(
            po.add_line(ItemId::new(), 5, usd(100), Utc::now())
                .is_err()
        );
        assert!(po.remove_line(1, Utc::now()).is_err());
    }

    #[test]
    fn duplicate_item_rejected() {
        let mut po = draft_with_line(10);
        let existing = po.lines[0].item_id;
        assert!(po.add_line(existing, 3, usd(100), Utc::now()).is_err());
    }

    #[test]
    fn partial_then_full_receipt() {
        let mut po = draft_with_line(10);
        po.submit(Utc::now()).unwrap();

        po.receive(
            &[Receipt {
                line_no: 1,
                quantity: 4,
            }],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(po.status, PurchaseOrderStatus::PartiallyReceived);
        assert_eq!(po.lines[0].outstanding(), 6);

        po.receive(
            &[Receipt {
                line_no: 1,
                quantity: 6,
            }],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(po.status, PurchaseOrderStatus::Received);
    }

    #[test]
    fn over_delivery_rejected_atomically() {
        let mut po = draft_with_line(10);
        po.add_line(ItemId::new(), 5, usd(100), Utc::now()).unwrap();
        po.submit(Utc::now()).unwrap();

        // Second receipt line is invalid; the first must not be applied.
        let err = po.receive(
            &[
                Receipt {
                    line_no: 1,
                    quantity: 2,
                },
                Receipt {
                    line_no: 2,
                    quantity: 6,
                },
            ],
            Utc::now(),
        );
        assert!(err.is_err());
        assert_eq!(po.lines[0].quantity_received, 0);
        assert_eq!(po.status, PurchaseOrderStatus::Submitted);
    }

    #[test]
    fn cannot_receive_draft_or_cancelled() {
        let mut po = draft_with_line(10);
        let receipt = [Receipt {
            line_no: 1,
            quantity: 1,
        }];
        assert!(po.receive(&receipt, Utc::now()).is_err());

        po.cancel(Utc::now()).unwrap();
        assert!(po.receive(&receipt, Utc::now()).is_err());
    }

    #[test]
    fn received_orders_cannot_be_cancelled() {
        let mut po = draft_with_line(2);
        po.submit(Utc::now()).unwrap();
        po.receive(
            &[Receipt {
                line_no: 1,
                quantity: 2,
            }],
            Utc::now(),
        )
        .unwrap();
        assert!(po.cancel(Utc::now()).is_err());
    }

    #[test]
    fn total_sums_lines() {
        let mut po = draft_with_line(10); // 10 x 250
        po.add_line(ItemId::new(), 4, usd(500), Utc::now()).unwrap(); // 4 x 500
        let total = po.total().unwrap().unwrap();
        assert_eq!(total.minor(), 4500);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Receiving in arbitrary accepted chunks never exceeds the
            /// ordered quantity and ends `Received` exactly when everything
            /// outstanding reaches zero.
            #[test]
            fn receipts_never_exceed_ordered(
                ordered in 1i64..40,
                chunks in proptest::collection::vec(1i64..10, 1..24)
            ) {
                let mut po = draft_with_line(ordered);
                po.submit(Utc::now()).unwrap();

                for quantity in chunks {
                    let _ = po.receive(
                        &[Receipt { line_no: 1, quantity }],
                        Utc::now(),
                    );
                    prop_assert!(po.lines[0].quantity_received <= ordered);
                }

                if po.lines[0].quantity_received == ordered {
                    prop_assert_eq!(po.status, PurchaseOrderStatus::Received);
                } else {
                    prop_assert!(matches!(
                        po.status,
                        PurchaseOrderStatus::Submitted | PurchaseOrderStatus::PartiallyReceived
                    ));
                }
            }
        }
    }
}
