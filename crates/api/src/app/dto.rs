//! Request DTOs and JSON mapping helpers.

use serde::{Deserialize, Deserializer};

use bizgrid_core::{Currency, Money};
use bizgrid_parties::ContactInfo;

use crate::app::envelope::ApiError;

/// Distinguishes an absent field (leave unchanged) from an explicit
/// `null` (clear the value). Pair with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Monetary amount on the wire: minor units plus a currency code.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyDto {
    pub amount_minor: i64,
    pub currency: String,
}

impl MoneyDto {
    pub fn into_money(self) -> Result<Money, ApiError> {
        let currency = Currency::parse(&self.currency)?;
        Ok(Money::from_minor(self.amount_minor, currency)?)
    }
}

// -------------------------
// Business settings
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ProvisionBusinessRequest {
    pub name: String,
    pub default_currency: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub default_currency: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
}

// -------------------------
// Parties
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterPartyRequest {
    pub name: String,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartyRequest {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
}

// -------------------------
// Staff & departments
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    /// Present-and-null clears the parent.
    #[serde(default, deserialize_with = "double_option")]
    pub parent: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct HireStaffRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub department: Option<Option<String>>,
}

// -------------------------
// Catalog
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub price: MoneyDto,
    pub duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub price: Option<MoneyDto>,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PackageLineRequest {
    pub service_id: String,
    pub sessions: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub lines: Vec<PackageLineRequest>,
    pub price: MoneyDto,
    pub validity_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct RepricePackageRequest {
    pub price: MoneyDto,
}

// -------------------------
// Inventory
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub reorder_level: Option<i64>,
    pub unit_cost: MoneyDto,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub unit_cost: Option<MoneyDto>,
    pub reorder_level: Option<i64>,
}

// -------------------------
// Finance
// -------------------------

#[derive(Debug, Deserialize)]
pub struct OpenWalletRequest {
    pub name: String,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct WalletMovementRequest {
    pub amount: MoneyDto,
}

#[derive(Debug, Deserialize)]
pub struct RecordExpenseRequest {
    pub category: String,
    pub amount: MoneyDto,
    /// ISO date (YYYY-MM-DD).
    pub incurred_on: chrono::NaiveDate,
    pub note: Option<String>,
    pub wallet_id: Option<String>,
}

// -------------------------
// Purchasing
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderLineRequest {
    pub item_id: String,
    pub quantity: i64,
    pub unit_cost: MoneyDto,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptLineRequest {
    pub line_no: u32,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReceiveOrderRequest {
    pub receipts: Vec<ReceiptLineRequest>,
}

// -------------------------
// POS
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SaleLineRequest {
    /// "item", "service", or "package".
    pub kind: String,
    pub id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: Option<String>,
    pub lines: Vec<SaleLineRequest>,
    pub discount: Option<MoneyDto>,
    /// "cash", "card", or "wallet".
    pub payment_method: String,
    pub wallet_id: Option<String>,
}

/// Parse a typed id out of a path/body string, mapping failures to 400.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: core::str::FromStr<Err = bizgrid_core::DomainError>,
{
    raw.parse::<T>().map_err(ApiError::from)
}
