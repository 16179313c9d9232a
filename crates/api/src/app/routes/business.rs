use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Response;
use axum::Json;
use chrono::Utc;

use bizgrid_business::BusinessProfile;
use bizgrid_core::Currency;

use crate::app::dto::{ProvisionBusinessRequest, UpdateBusinessRequest};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

/// Create the tenant's profile. One profile per business.
pub async fn provision(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<ProvisionBusinessRequest>,
) -> Result<Response, ApiError> {
    principal.require("business:provision")?;
    let business_id = business.business_id();

    if services.profiles.get(business_id, &business_id).await?.is_some() {
        return Err(ApiError::conflict("business is already provisioned"));
    }

    let currency = Currency::parse(&req.default_currency)?;
    let profile = BusinessProfile::provision(business_id, req.name, currency, Utc::now())?;
    services
        .profiles
        .upsert(business_id, business_id, profile.clone())
        .await?;
    Ok(envelope::created(profile))
}

pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("business:settings:read")?;
    let business_id = business.business_id();
    let profile = found(
        services.profiles.get(business_id, &business_id).await?,
        "business profile",
    )?;
    Ok(envelope::ok(profile))
}

pub async fn update_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<UpdateBusinessRequest>,
) -> Result<Response, ApiError> {
    principal.require("business:settings:update")?;
    let business_id = business.business_id();

    let mut profile = found(
        services.profiles.get(business_id, &business_id).await?,
        "business profile",
    )?;

    let currency = match req.default_currency {
        Some(code) => Some(Currency::parse(&code)?),
        None => None,
    };
    profile.update_settings(
        req.name,
        currency,
        req.contact_email,
        req.contact_phone,
        req.address,
        Utc::now(),
    )?;

    services
        .profiles
        .upsert(business_id, business_id, profile.clone())
        .await?;
    Ok(envelope::ok(profile))
}
