use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::ItemId;
use bizgrid_inventory::Item;

use crate::app::dto::{AdjustStockRequest, CreateItemRequest, UpdateItemRequest, parse_id};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("inventory:read")?;
    let items = services.items.list(business.business_id()).await?;
    Ok(envelope::ok(items))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CreateItemRequest>,
) -> Result<Response, ApiError> {
    principal.require("inventory:create")?;
    let business_id = business.business_id();

    // SKU is unique per business.
    let existing = services.items.list(business_id).await?;
    if existing.iter().any(|i| i.sku == req.sku) {
        return Err(ApiError::conflict("sku is already in use"));
    }

    let item = Item::create(
        business_id,
        ItemId::new(),
        req.sku,
        req.name,
        req.reorder_level.unwrap_or(0),
        req.unit_cost.into_money()?,
        Utc::now(),
    )?;
    services
        .items
        .upsert(business_id, item.id, item.clone())
        .await?;
    Ok(envelope::created(item))
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("inventory:read")?;
    let id: ItemId = parse_id(&id)?;
    let item = found(
        services.items.get(business.business_id(), &id).await?,
        "item",
    )?;
    Ok(envelope::ok(item))
}

/// Partial update; the SKU is immutable and the unit cost currency fixed.
pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Response, ApiError> {
    principal.require("inventory:update")?;
    let id: ItemId = parse_id(&id)?;
    let mut item = found(
        services.items.get(business.business_id(), &id).await?,
        "item",
    )?;
    let unit_cost = req.unit_cost.map(|m| m.into_money()).transpose()?;
    item.update(req.name, unit_cost, req.reorder_level, Utc::now())?;
    services
        .items
        .upsert(business.business_id(), id, item.clone())
        .await?;
    Ok(envelope::ok(item))
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("inventory:delete")?;
    let id: ItemId = parse_id(&id)?;
    if !services.items.remove(business.business_id(), &id).await? {
        return Err(ApiError::not_found("item not found"));
    }
    Ok(envelope::ok(serde_json::json!({ "deleted": true })))
}

/// Signed stock adjustment. The domain refuses zero deltas and any delta
/// that would take the quantity negative.
pub async fn adjust(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Response, ApiError> {
    principal.require("inventory:adjust")?;
    let id: ItemId = parse_id(&id)?;
    let mut item = found(
        services.items.get(business.business_id(), &id).await?,
        "item",
    )?;
    item.adjust_stock(req.delta, Utc::now())?;
    services
        .items
        .upsert(business.business_id(), id, item.clone())
        .await?;
    Ok(envelope::ok(item))
}

/// Items at or below their reorder level.
pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("inventory:read")?;
    let mut items = services.items.list(business.business_id()).await?;
    items.retain(Item::is_low_stock);
    Ok(envelope::ok(items))
}
