//! Finance: wallets and expenses.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::{Currency, ExpenseId, WalletId};
use bizgrid_finance::{Expense, Wallet};

use crate::app::dto::{
    OpenWalletRequest, RecordExpenseRequest, WalletMovementRequest, parse_id,
};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

// Wallets.

pub async fn list_wallets(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("wallets:read")?;
    let wallets = services.wallets.list(business.business_id()).await?;
    Ok(envelope::ok(wallets))
}

pub async fn open_wallet(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<OpenWalletRequest>,
) -> Result<Response, ApiError> {
    principal.require("wallets:create")?;
    let wallet = Wallet::open(
        business.business_id(),
        WalletId::new(),
        req.name,
        Currency::parse(&req.currency)?,
        Utc::now(),
    )?;
    services
        .wallets
        .upsert(business.business_id(), wallet.id, wallet.clone())
        .await?;
    Ok(envelope::created(wallet))
}

pub async fn get_wallet(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("wallets:read")?;
    let id: WalletId = parse_id(&id)?;
    let wallet = found(
        services.wallets.get(business.business_id(), &id).await?,
        "wallet",
    )?;
    Ok(envelope::ok(wallet))
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<WalletMovementRequest>,
) -> Result<Response, ApiError> {
    principal.require("wallets:update")?;
    let id: WalletId = parse_id(&id)?;
    let mut wallet = found(
        services.wallets.get(business.business_id(), &id).await?,
        "wallet",
    )?;
    wallet.deposit(req.amount.into_money()?, Utc::now())?;
    services
        .wallets
        .upsert(business.business_id(), id, wallet.clone())
        .await?;
    Ok(envelope::ok(wallet))
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<WalletMovementRequest>,
) -> Result<Response, ApiError> {
    principal.require("wallets:update")?;
    let id: WalletId = parse_id(&id)?;
    let mut wallet = found(
        services.wallets.get(business.business_id(), &id).await?,
        "wallet",
    )?;
    wallet.withdraw(req.amount.into_money()?, Utc::now())?;
    services
        .wallets
        .upsert(business.business_id(), id, wallet.clone())
        .await?;
    Ok(envelope::ok(wallet))
}

// Expenses.

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("expenses:read")?;
    let expenses = services.expenses.list(business.business_id()).await?;
    Ok(envelope::ok(expenses))
}

pub async fn get_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("expenses:read")?;
    let id: ExpenseId = parse_id(&id)?;
    let expense = found(
        services.expenses.get(business.business_id(), &id).await?,
        "expense",
    )?;
    Ok(envelope::ok(expense))
}

/// Record an expense. With a funding wallet, the withdrawal is applied
/// first; a failed withdrawal (wrong currency, insufficient funds) leaves
/// nothing recorded.
pub async fn record_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<RecordExpenseRequest>,
) -> Result<Response, ApiError> {
    principal.require("expenses:create")?;
    let business_id = business.business_id();
    let amount = req.amount.into_money()?;

    let wallet_id = match req.wallet_id.as_deref() {
        Some(raw) => Some(parse_id::<WalletId>(raw)?),
        None => None,
    };

    let expense = Expense::record(
        business_id,
        ExpenseId::new(),
        req.category,
        amount,
        req.incurred_on,
        req.note,
        wallet_id,
        Utc::now(),
    )?;

    if let Some(wallet_id) = wallet_id {
        let mut wallet = found(
            services.wallets.get(business_id, &wallet_id).await?,
            "wallet",
        )?;
        wallet.withdraw(amount, Utc::now())?;
        services.wallets.upsert(business_id, wallet_id, wallet).await?;
    }

    services
        .expenses
        .upsert(business_id, expense.id, expense.clone())
        .await?;
    Ok(envelope::created(expense))
}
