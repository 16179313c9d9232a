//! Point of sale: checkout, lookup, and refunds.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::{ItemId, Money, PackageId, PartyId, SaleId, ServiceId, WalletId};
use bizgrid_parties::PartyKind;
use bizgrid_pos::{PaymentMethod, Sale, SaleLine, SaleLineRef};

use crate::app::dto::{CheckoutRequest, parse_id};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("pos:read")?;
    let sales = services.sales.list(business.business_id()).await?;
    Ok(envelope::ok(sales))
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("pos:read")?;
    let id: SaleId = parse_id(&id)?;
    let sale = found(
        services.sales.get(business.business_id(), &id).await?,
        "sale",
    )?;
    Ok(envelope::ok(sale))
}

/// Checkout: price the lines from the catalog and inventory, validate stock,
/// decrement item quantities, and credit the wallet for wallet payments.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Response, ApiError> {
    principal.require("pos:checkout")?;
    let business_id = business.business_id();
    let now = Utc::now();

    let customer_id = match req.customer_id.as_deref() {
        Some(raw) => {
            let id: PartyId = parse_id(raw)?;
            let customer = found(services.parties.get(business_id, &id).await?, "customer")?;
            if customer.kind != PartyKind::Customer {
                return Err(ApiError::not_found("customer not found"));
            }
            Some(id)
        }
        None => None,
    };

    if req.lines.is_empty() {
        return Err(ApiError::bad_request("sale must have at least one line"));
    }

    // Price every line from current records.
    let mut lines = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let (reference, description, unit_price) = match line.kind.as_str() {
            "item" => {
                let id: ItemId = parse_id(&line.id)?;
                let item = found(services.items.get(business_id, &id).await?, "item")?;
                (SaleLineRef::Item(id), item.name, item.unit_cost)
            }
            "service" => {
                let id: ServiceId = parse_id(&line.id)?;
                let service = found(services.services.get(business_id, &id).await?, "service")?;
                if !service.active {
                    return Err(ApiError::conflict("service is retired"));
                }
                (SaleLineRef::Service(id), service.name, service.price)
            }
            "package" => {
                let id: PackageId = parse_id(&line.id)?;
                let package = found(services.packages.get(business_id, &id).await?, "package")?;
                if !package.active {
                    return Err(ApiError::conflict("package is retired"));
                }
                (SaleLineRef::Package(id), package.name, package.price)
            }
            other => {
                return Err(ApiError::bad_request(format!(
                    "unknown line kind '{other}'"
                )));
            }
        };
        lines.push(SaleLine {
            reference,
            description,
            quantity: line.quantity,
            unit_price,
        });
    }

    let currency = lines[0].unit_price.currency();
    let discount = match req.discount {
        Some(dto) => dto.into_money()?,
        None => Money::zero(currency),
    };

    let payment = match req.payment_method.as_str() {
        "cash" => PaymentMethod::Cash,
        "card" => PaymentMethod::Card,
        "wallet" => {
            let raw = req
                .wallet_id
                .as_deref()
                .ok_or_else(|| ApiError::bad_request("wallet payment needs a wallet_id"))?;
            PaymentMethod::Wallet(parse_id::<WalletId>(raw)?)
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "unknown payment method '{other}'"
            )));
        }
    };

    let sale = Sale::checkout(
        business_id,
        SaleId::new(),
        customer_id,
        lines,
        discount,
        payment,
        now,
    )?;

    // Apply stock movements. Each item was just loaded, so the only failure
    // left is insufficient stock, which aborts before anything persists.
    let mut adjusted = Vec::new();
    for (item_id, quantity) in sale.item_movements() {
        let mut item = found(services.items.get(business_id, &item_id).await?, "item")?;
        item.adjust_stock(-quantity, now)?;
        adjusted.push(item);
    }

    // Wallet payments credit the wallet with the sale total.
    let paid_wallet = match sale.payment {
        PaymentMethod::Wallet(wallet_id) => {
            let mut wallet = found(services.wallets.get(business_id, &wallet_id).await?, "wallet")?;
            wallet.deposit(sale.total, now)?;
            Some(wallet)
        }
        _ => None,
    };

    for item in adjusted {
        services.items.upsert(business_id, item.id, item).await?;
    }
    if let Some(wallet) = paid_wallet {
        services.wallets.upsert(business_id, wallet.id, wallet).await?;
    }
    services
        .sales
        .upsert(business_id, sale.id, sale.clone())
        .await?;
    Ok(envelope::created(sale))
}

/// Refund a sale: restore item stock and claw back wallet credits.
pub async fn refund(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("pos:refund")?;
    let business_id = business.business_id();
    let id: SaleId = parse_id(&id)?;
    let now = Utc::now();

    let mut sale = found(services.sales.get(business_id, &id).await?, "sale")?;
    sale.refund(now)?;

    // Apply every leg in memory before persisting anything, so a failed
    // claw-back (say the wallet balance has since dropped below the sale
    // total) leaves stock and the sale untouched and the refund retryable.
    let mut restored = Vec::new();
    for (item_id, quantity) in sale.item_movements() {
        let mut item = found(services.items.get(business_id, &item_id).await?, "item")?;
        item.adjust_stock(quantity, now)?;
        restored.push(item);
    }

    let clawed_back = match sale.payment {
        PaymentMethod::Wallet(wallet_id) => {
            let mut wallet =
                found(services.wallets.get(business_id, &wallet_id).await?, "wallet")?;
            wallet.withdraw(sale.total, now)?;
            Some(wallet)
        }
        _ => None,
    };

    for item in restored {
        services.items.upsert(business_id, item.id, item).await?;
    }
    if let Some(wallet) = clawed_back {
        services.wallets.upsert(business_id, wallet.id, wallet).await?;
    }
    services
        .sales
        .upsert(business_id, id, sale.clone())
        .await?;
    Ok(envelope::ok(sale))
}
