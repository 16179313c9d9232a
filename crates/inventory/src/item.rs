use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizgrid_core::{BusinessId, DomainError, DomainResult, Entity, ItemId, Money};

/// A stocked inventory item.
///
/// # Invariants
/// - `quantity` never goes negative.
/// - Zero-delta adjustments are rejected (they would record nothing).
/// - SKU is uppercase alphanumeric with dashes, unique per business
///   (uniqueness checked at the API layer against the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub business_id: BusinessId,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub reorder_level: i64,
    pub unit_cost: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn create(
        business_id: BusinessId,
        id: ItemId,
        sku: String,
        name: String,
        reorder_level: i64,
        unit_cost: Money,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Self::validate_sku(&sku)?;
        if reorder_level < 0 {
            return Err(DomainError::validation("reorder level cannot be negative"));
        }
        Ok(Self {
            id,
            business_id,
            sku,
            name,
            quantity: 0,
            reorder_level,
            unit_cost,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_sku(sku: &str) -> DomainResult<()> {
        if sku.is_empty() || sku.len() > 32 {
            return Err(DomainError::validation("sku must be 1..=32 characters"));
        }
        if !sku
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation(
                "sku must be uppercase alphanumeric with dashes",
            ));
        }
        Ok(())
    }

    /// Adjust stock by a signed delta. The resulting quantity must stay
    /// non-negative; a zero delta is rejected.
    pub fn adjust_stock(&mut self, delta: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }
        let new_quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
        if new_quantity < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.quantity = new_quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Partial update of the mutable fields. The SKU is immutable and the
    /// unit cost currency cannot change once set.
    pub fn update(
        &mut self,
        name: Option<String>,
        unit_cost: Option<Money>,
        reorder_level: Option<i64>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(cost) = unit_cost {
            if cost.currency() != self.unit_cost.currency() {
                return Err(DomainError::invariant(
                    "item unit cost currency cannot change",
                ));
            }
            self.unit_cost = cost;
        }
        if let Some(level) = reorder_level {
            if level < 0 {
                return Err(DomainError::validation("reorder level cannot be negative"));
            }
            self.reorder_level = level;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn business_id(&self) -> BusinessId {
        self.business_id
    }
}
