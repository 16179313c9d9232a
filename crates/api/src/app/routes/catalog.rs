//! Catalog: services and packages.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_catalog::{Package, PackageLine, Service};
use bizgrid_core::{PackageId, ServiceId};

use crate::app::dto::{
    CreatePackageRequest, CreateServiceRequest, RepricePackageRequest, UpdateServiceRequest,
    parse_id,
};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

// Services.

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("services:read")?;
    let catalog = services.services.list(business.business_id()).await?;
    Ok(envelope::ok(catalog))
}

pub async fn create_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<Response, ApiError> {
    principal.require("services:create")?;
    let service = Service::create(
        business.business_id(),
        ServiceId::new(),
        req.name,
        req.price.into_money()?,
        req.duration_minutes,
        Utc::now(),
    )?;
    services
        .services
        .upsert(business.business_id(), service.id, service.clone())
        .await?;
    Ok(envelope::created(service))
}

pub async fn get_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("services:read")?;
    let id: ServiceId = parse_id(&id)?;
    let service = found(
        services.services.get(business.business_id(), &id).await?,
        "service",
    )?;
    Ok(envelope::ok(service))
}

pub async fn update_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Response, ApiError> {
    principal.require("services:update")?;
    let id: ServiceId = parse_id(&id)?;
    let mut service = found(
        services.services.get(business.business_id(), &id).await?,
        "service",
    )?;

    let price = match req.price {
        Some(dto) => Some(dto.into_money()?),
        None => None,
    };
    service.update(req.name, price, req.duration_minutes, Utc::now())?;

    services
        .services
        .upsert(business.business_id(), id, service.clone())
        .await?;
    Ok(envelope::ok(service))
}

pub async fn retire_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("services:delete")?;
    let id: ServiceId = parse_id(&id)?;
    let mut service = found(
        services.services.get(business.business_id(), &id).await?,
        "service",
    )?;
    service.retire(Utc::now())?;
    services
        .services
        .upsert(business.business_id(), id, service.clone())
        .await?;
    Ok(envelope::ok(service))
}

// Packages.

pub async fn list_packages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("packages:read")?;
    let packages = services.packages.list(business.business_id()).await?;
    Ok(envelope::ok(packages))
}

pub async fn create_package(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<Response, ApiError> {
    principal.require("packages:create")?;
    let business_id = business.business_id();

    // Every bundled service must exist.
    let mut lines = Vec::with_capacity(req.lines.len());
    for line in req.lines {
        let service_id: ServiceId = parse_id(&line.service_id)?;
        if services.services.get(business_id, &service_id).await?.is_none() {
            return Err(ApiError::bad_request("bundled service does not exist"));
        }
        lines.push(PackageLine {
            service_id,
            sessions: line.sessions,
        });
    }

    let package = Package::create(
        business_id,
        PackageId::new(),
        req.name,
        lines,
        req.price.into_money()?,
        req.validity_days,
        Utc::now(),
    )?;
    services
        .packages
        .upsert(business_id, package.id, package.clone())
        .await?;
    Ok(envelope::created(package))
}

pub async fn get_package(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("packages:read")?;
    let id: PackageId = parse_id(&id)?;
    let package = found(
        services.packages.get(business.business_id(), &id).await?,
        "package",
    )?;
    Ok(envelope::ok(package))
}

pub async fn reprice_package(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<RepricePackageRequest>,
) -> Result<Response, ApiError> {
    principal.require("packages:update")?;
    let id: PackageId = parse_id(&id)?;
    let mut package = found(
        services.packages.get(business.business_id(), &id).await?,
        "package",
    )?;
    package.reprice(req.price.into_money()?, Utc::now())?;
    services
        .packages
        .upsert(business.business_id(), id, package.clone())
        .await?;
    Ok(envelope::ok(package))
}

pub async fn retire_package(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("packages:delete")?;
    let id: PackageId = parse_id(&id)?;
    let mut package = found(
        services.packages.get(business.business_id(), &id).await?,
        "package",
    )?;
    package.retire(Utc::now())?;
    services
        .packages
        .upsert(business.business_id(), id, package.clone())
        .await?;
    Ok(envelope::ok(package))
}
