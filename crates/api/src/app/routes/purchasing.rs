use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::{ItemId, PartyId, PurchaseOrderId};
use bizgrid_parties::PartyKind;
use bizgrid_purchasing::{PurchaseOrder, Receipt};

use crate::app::dto::{
    AddOrderLineRequest, CreatePurchaseOrderRequest, ReceiveOrderRequest, parse_id,
};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:read")?;
    let orders = services.purchase_orders.list(business.business_id()).await?;
    Ok(envelope::ok(orders))
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:read")?;
    let id: PurchaseOrderId = parse_id(&id)?;
    let order = found(
        services.purchase_orders.get(business.business_id(), &id).await?,
        "purchase order",
    )?;
    Ok(envelope::ok(order))
}

pub async fn create_draft(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CreatePurchaseOrderRequest>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:create")?;
    let business_id = business.business_id();

    let supplier_id: PartyId = parse_id(&req.supplier_id)?;
    let supplier = found(
        services.parties.get(business_id, &supplier_id).await?,
        "supplier",
    )?;
    if supplier.kind != PartyKind::Supplier {
        return Err(ApiError::not_found("supplier not found"));
    }
    if !supplier.is_active() {
        return Err(ApiError::conflict("supplier is archived"));
    }

    let order = PurchaseOrder::draft(business_id, PurchaseOrderId::new(), supplier_id, Utc::now());
    services
        .purchase_orders
        .upsert(business_id, order.id, order.clone())
        .await?;
    Ok(envelope::created(order))
}

pub async fn add_line(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<AddOrderLineRequest>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:update")?;
    let business_id = business.business_id();
    let id: PurchaseOrderId = parse_id(&id)?;
    let item_id: ItemId = parse_id(&req.item_id)?;

    if services.items.get(business_id, &item_id).await?.is_none() {
        return Err(ApiError::bad_request("item does not exist"));
    }

    let mut order = found(
        services.purchase_orders.get(business_id, &id).await?,
        "purchase order",
    )?;
    order.add_line(item_id, req.quantity, req.unit_cost.into_money()?, Utc::now())?;
    services
        .purchase_orders
        .upsert(business_id, id, order.clone())
        .await?;
    Ok(envelope::ok(order))
}

pub async fn remove_line(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path((id, line_no)): Path<(String, u32)>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:update")?;
    let business_id = business.business_id();
    let id: PurchaseOrderId = parse_id(&id)?;

    let mut order = found(
        services.purchase_orders.get(business_id, &id).await?,
        "purchase order",
    )?;
    order.remove_line(line_no, Utc::now())?;
    services
        .purchase_orders
        .upsert(business_id, id, order.clone())
        .await?;
    Ok(envelope::ok(order))
}

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:update")?;
    let business_id = business.business_id();
    let id: PurchaseOrderId = parse_id(&id)?;

    let mut order = found(
        services.purchase_orders.get(business_id, &id).await?,
        "purchase order",
    )?;
    order.submit(Utc::now())?;
    services
        .purchase_orders
        .upsert(business_id, id, order.clone())
        .await?;
    Ok(envelope::ok(order))
}

/// Receive stock against the order. The order validates every receipt before
/// applying any; on success the received quantities land in inventory.
pub async fn receive(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<ReceiveOrderRequest>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:update")?;
    let business_id = business.business_id();
    let id: PurchaseOrderId = parse_id(&id)?;

    let mut order = found(
        services.purchase_orders.get(business_id, &id).await?,
        "purchase order",
    )?;

    let receipts: Vec<Receipt> = req
        .receipts
        .iter()
        .map(|r| Receipt {
            line_no: r.line_no,
            quantity: r.quantity,
        })
        .collect();
    order.receive(&receipts, Utc::now())?;

    // Stock in the received quantities.
    for receipt in &receipts {
        let Some(line) = order.lines.iter().find(|l| l.line_no == receipt.line_no) else {
            continue;
        };
        let mut item = found(
            services.items.get(business_id, &line.item_id).await?,
            "item",
        )?;
        item.adjust_stock(receipt.quantity, Utc::now())?;
        services.items.upsert(business_id, item.id, item).await?;
    }

    services
        .purchase_orders
        .upsert(business_id, id, order.clone())
        .await?;
    Ok(envelope::ok(order))
}

pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("purchasing:update")?;
    let business_id = business.business_id();
    let id: PurchaseOrderId = parse_id(&id)?;

    let mut order = found(
        services.purchase_orders.get(business_id, &id).await?,
        "purchase order",
    )?;
    order.cancel(Utc::now())?;
    services
        .purchase_orders
        .upsert(business_id, id, order.clone())
        .await?;
    Ok(envelope::ok(order))
}
