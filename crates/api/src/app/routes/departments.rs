use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_core::DepartmentId;
use bizgrid_staff::Department;

use crate::app::dto::{CreateDepartmentRequest, UpdateDepartmentRequest, parse_id};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

/// A referenced parent must exist in the caller's business.
async fn check_parent(
    services: &AppServices,
    business: BusinessContext,
    parent: DepartmentId,
) -> Result<(), ApiError> {
    if services
        .departments
        .get(business.business_id(), &parent)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request("parent department does not exist"));
    }
    Ok(())
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("departments:read")?;
    let departments = services.departments.list(business.business_id()).await?;
    Ok(envelope::ok(departments))
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<Response, ApiError> {
    principal.require("departments:create")?;

    let parent = match req.parent.as_deref() {
        Some(raw) => {
            let parent: DepartmentId = parse_id(raw)?;
            check_parent(&services, business, parent).await?;
            Some(parent)
        }
        None => None,
    };

    let department = Department::create(
        business.business_id(),
        DepartmentId::new(),
        req.name,
        parent,
        Utc::now(),
    )?;
    services
        .departments
        .upsert(business.business_id(), department.id, department.clone())
        .await?;
    Ok(envelope::created(department))
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("departments:read")?;
    let id: DepartmentId = parse_id(&id)?;
    let department = found(
        services.departments.get(business.business_id(), &id).await?,
        "department",
    )?;
    Ok(envelope::ok(department))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<Response, ApiError> {
    principal.require("departments:update")?;
    let id: DepartmentId = parse_id(&id)?;
    let mut department = found(
        services.departments.get(business.business_id(), &id).await?,
        "department",
    )?;

    if let Some(name) = req.name {
        department.rename(name, Utc::now())?;
    }
    if let Some(parent) = req.parent {
        let parent = match parent.as_deref() {
            Some(raw) => {
                let parent: DepartmentId = parse_id(raw)?;
                check_parent(&services, business, parent).await?;
                Some(parent)
            }
            None => None,
        };
        department.set_parent(parent, Utc::now())?;
    }

    services
        .departments
        .upsert(business.business_id(), id, department.clone())
        .await?;
    Ok(envelope::ok(department))
}

/// Delete a department. Refused while child departments or staff still
/// reference it.
pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("departments:delete")?;
    let id: DepartmentId = parse_id(&id)?;
    let business_id = business.business_id();

    let departments = services.departments.list(business_id).await?;
    if departments.iter().any(|d| d.parent == Some(id)) {
        return Err(ApiError::conflict("department has child departments"));
    }
    let staff = services.staff.list(business_id).await?;
    if staff.iter().any(|s| s.department == Some(id)) {
        return Err(ApiError::conflict("department has assigned staff"));
    }

    if !services.departments.remove(business_id, &id).await? {
        return Err(ApiError::not_found("department not found"));
    }
    Ok(envelope::ok(serde_json::json!({ "deleted": true })))
}
