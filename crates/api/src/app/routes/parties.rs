//! Customers and suppliers: both are `Party` records distinguished by kind,
//! served under separate route prefixes with separate permission gates.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::PartyId;
use bizgrid_parties::{ContactInfo, Party, PartyKind};

use crate::app::dto::{RegisterPartyRequest, UpdatePartyRequest, parse_id};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

fn resource(kind: PartyKind) -> &'static str {
    match kind {
        PartyKind::Customer => "customer",
        PartyKind::Supplier => "supplier",
    }
}

fn permission(kind: PartyKind, action: &str) -> &'static str {
    match (kind, action) {
        (PartyKind::Customer, "read") => "customers:read",
        (PartyKind::Customer, "create") => "customers:create",
        (PartyKind::Customer, "update") => "customers:update",
        (PartyKind::Customer, _) => "customers:delete",
        (PartyKind::Supplier, "read") => "suppliers:read",
        (PartyKind::Supplier, "create") => "suppliers:create",
        (PartyKind::Supplier, "update") => "suppliers:update",
        (PartyKind::Supplier, _) => "suppliers:delete",
    }
}

async fn list(
    services: &AppServices,
    business: BusinessContext,
    principal: &PrincipalContext,
    kind: PartyKind,
) -> Result<Response, ApiError> {
    principal.require(permission(kind, "read"))?;
    let mut parties = services.parties.list(business.business_id()).await?;
    parties.retain(|p| p.kind == kind);
    Ok(envelope::ok(parties))
}

async fn create(
    services: &AppServices,
    business: BusinessContext,
    principal: &PrincipalContext,
    kind: PartyKind,
    req: RegisterPartyRequest,
) -> Result<Response, ApiError> {
    principal.require(permission(kind, "create"))?;
    let party = Party::register(
        business.business_id(),
        PartyId::new(),
        kind,
        req.name,
        req.contact.unwrap_or_else(ContactInfo::default),
        Utc::now(),
    )?;
    services
        .parties
        .upsert(business.business_id(), party.id, party.clone())
        .await?;
    Ok(envelope::created(party))
}

async fn get_one(
    services: &AppServices,
    business: BusinessContext,
    principal: &PrincipalContext,
    kind: PartyKind,
    id: &str,
) -> Result<Response, ApiError> {
    principal.require(permission(kind, "read"))?;
    let id: PartyId = parse_id(id)?;
    let party = found(
        services.parties.get(business.business_id(), &id).await?,
        resource(kind),
    )?;
    if party.kind != kind {
        return Err(ApiError::not_found(format!("{} not found", resource(kind))));
    }
    Ok(envelope::ok(party))
}

async fn update(
    services: &AppServices,
    business: BusinessContext,
    principal: &PrincipalContext,
    kind: PartyKind,
    id: &str,
    req: UpdatePartyRequest,
) -> Result<Response, ApiError> {
    principal.require(permission(kind, "update"))?;
    let id: PartyId = parse_id(id)?;
    let mut party = found(
        services.parties.get(business.business_id(), &id).await?,
        resource(kind),
    )?;
    if party.kind != kind {
        return Err(ApiError::not_found(format!("{} not found", resource(kind))));
    }
    party.update_details(req.name, req.contact, Utc::now())?;
    services
        .parties
        .upsert(business.business_id(), id, party.clone())
        .await?;
    Ok(envelope::ok(party))
}

async fn archive(
    services: &AppServices,
    business: BusinessContext,
    principal: &PrincipalContext,
    kind: PartyKind,
    id: &str,
) -> Result<Response, ApiError> {
    principal.require(permission(kind, "delete"))?;
    let id: PartyId = parse_id(id)?;
    let mut party = found(
        services.parties.get(business.business_id(), &id).await?,
        resource(kind),
    )?;
    if party.kind != kind {
        return Err(ApiError::not_found(format!("{} not found", resource(kind))));
    }
    party.archive(Utc::now())?;
    services
        .parties
        .upsert(business.business_id(), id, party.clone())
        .await?;
    Ok(envelope::ok(party))
}

// Customers.

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    list(&services, business, &principal, PartyKind::Customer).await
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<RegisterPartyRequest>,
) -> Result<Response, ApiError> {
    create(&services, business, &principal, PartyKind::Customer, req).await
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    get_one(&services, business, &principal, PartyKind::Customer, &id).await
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePartyRequest>,
) -> Result<Response, ApiError> {
    update(&services, business, &principal, PartyKind::Customer, &id, req).await
}

pub async fn archive_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    archive(&services, business, &principal, PartyKind::Customer, &id).await
}

// Suppliers.

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    list(&services, business, &principal, PartyKind::Supplier).await
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<RegisterPartyRequest>,
) -> Result<Response, ApiError> {
    create(&services, business, &principal, PartyKind::Supplier, req).await
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    get_one(&services, business, &principal, PartyKind::Supplier, &id).await
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePartyRequest>,
) -> Result<Response, ApiError> {
    update(&services, business, &principal, PartyKind::Supplier, &id, req).await
}

pub async fn archive_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    archive(&services, business, &principal, PartyKind::Supplier, &id).await
}
