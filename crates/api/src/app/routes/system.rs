use axum::Extension;
use axum::response::Response;
use serde_json::json;

use crate::app::envelope;
use crate::context::{BusinessContext, PrincipalContext};

/// Unauthenticated liveness probe.
pub async fn health() -> Response {
    envelope::ok(json!({ "status": "ok" }))
}

/// Who the token says the caller is.
pub async fn whoami(
    Extension(business): Extension<BusinessContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let permissions: Vec<&str> = principal.permissions().iter().collect();
    envelope::ok(json!({
        "user_id": principal.user_id(),
        "business_id": business.business_id(),
        "role": principal.role(),
        "permissions": permissions,
    }))
}
