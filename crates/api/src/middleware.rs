use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, middleware::Next, response::Response};
use chrono::Utc;

use bizgrid_auth::{Hs256TokenDecoder, PermissionSet};

use crate::app::envelope::ApiError;
use crate::context::{BusinessContext, PrincipalContext};

#[derive(Clone)]
pub struct AuthState {
    pub decoder: Arc<Hs256TokenDecoder>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .decoder
        .decode(token, Utc::now())
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let permissions: PermissionSet = claims.permissions.iter().cloned().collect();

    req.extensions_mut()
        .insert(BusinessContext::new(claims.business_id));
    req.extensions_mut().insert(PrincipalContext::new(
        claims.sub,
        claims.role,
        permissions,
    ));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("malformed authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("authorization must use a bearer token"))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("empty bearer token"));
    }

    Ok(token)
}
