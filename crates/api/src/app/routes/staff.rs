use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::response::Response;
use chrono::Utc;

use bizgrid_auth::Role;
use bizgrid_core::{DepartmentId, StaffId};
use bizgrid_staff::StaffMember;

use crate::app::dto::{HireStaffRequest, UpdateStaffRequest, parse_id};
use crate::app::envelope::{self, ApiError};
use crate::app::routes::found;
use crate::app::services::AppServices;
use crate::context::{BusinessContext, PrincipalContext};

/// Email must be unique among the business's staff.
async fn check_email_free(
    services: &AppServices,
    business: BusinessContext,
    email: &str,
    except: Option<StaffId>,
) -> Result<(), ApiError> {
    let staff = services.staff.list(business.business_id()).await?;
    if staff
        .iter()
        .any(|s| s.email == email && Some(s.id) != except)
    {
        return Err(ApiError::conflict("email is already in use"));
    }
    Ok(())
}

async fn check_department(
    services: &AppServices,
    business: BusinessContext,
    department: DepartmentId,
) -> Result<(), ApiError> {
    if services
        .departments
        .get(business.business_id(), &department)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request("department does not exist"));
    }
    Ok(())
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Response, ApiError> {
    principal.require("staff:read")?;
    let staff = services.staff.list(business.business_id()).await?;
    Ok(envelope::ok(staff))
}

pub async fn hire(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(req): Json<HireStaffRequest>,
) -> Result<Response, ApiError> {
    principal.require("staff:create")?;

    check_email_free(&services, business, &req.email, None).await?;
    let department = match req.department.as_deref() {
        Some(raw) => {
            let department: DepartmentId = parse_id(raw)?;
            check_department(&services, business, department).await?;
            Some(department)
        }
        None => None,
    };

    let member = StaffMember::hire(
        business.business_id(),
        StaffId::new(),
        req.name,
        req.email,
        Role::parse(&req.role)?,
        department,
        Utc::now(),
    )?;
    services
        .staff
        .upsert(business.business_id(), member.id, member.clone())
        .await?;
    Ok(envelope::created(member))
}

pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("staff:read")?;
    let id: StaffId = parse_id(&id)?;
    let member = found(
        services.staff.get(business.business_id(), &id).await?,
        "staff member",
    )?;
    Ok(envelope::ok(member))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStaffRequest>,
) -> Result<Response, ApiError> {
    principal.require("staff:update")?;
    let id: StaffId = parse_id(&id)?;
    let mut member = found(
        services.staff.get(business.business_id(), &id).await?,
        "staff member",
    )?;

    if let Some(email) = req.email.as_deref() {
        check_email_free(&services, business, email, Some(id)).await?;
    }
    member.update_details(req.name, req.email, Utc::now())?;

    if let Some(role) = req.role.as_deref() {
        member.change_role(Role::parse(role)?, Utc::now())?;
    }
    if let Some(department) = req.department {
        let department = match department.as_deref() {
            Some(raw) => {
                let department: DepartmentId = parse_id(raw)?;
                check_department(&services, business, department).await?;
                Some(department)
            }
            None => None,
        };
        member.assign_department(department, Utc::now())?;
    }

    services
        .staff
        .upsert(business.business_id(), id, member.clone())
        .await?;
    Ok(envelope::ok(member))
}

pub async fn deactivate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("staff:delete")?;
    let id: StaffId = parse_id(&id)?;
    let mut member = found(
        services.staff.get(business.business_id(), &id).await?,
        "staff member",
    )?;
    member.deactivate(Utc::now())?;
    services
        .staff
        .upsert(business.business_id(), id, member.clone())
        .await?;
    Ok(envelope::ok(member))
}

pub async fn reactivate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    principal.require("staff:update")?;
    let id: StaffId = parse_id(&id)?;
    let mut member = found(
        services.staff.get(business.business_id(), &id).await?,
        "staff member",
    )?;
    member.reactivate(Utc::now())?;
    services
        .staff
        .upsert(business.business_id(), id, member.clone())
        .await?;
    Ok(envelope::ok(member))
}
