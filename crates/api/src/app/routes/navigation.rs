use axum::Extension;
use axum::response::Response;

use bizgrid_auth::navigation::{default_navigation, filter_navigation};

use crate::app::envelope;
use crate::context::PrincipalContext;

/// The default navigation tree, filtered to what the caller may see.
pub async fn tree(Extension(principal): Extension<PrincipalContext>) -> Response {
    let visible = filter_navigation(
        &default_navigation(),
        principal.role(),
        principal.permissions(),
    );
    envelope::ok(visible)
}
