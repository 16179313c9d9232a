//! Route handlers, one module per resource.
//!
//! Every protected handler follows the same shape: authorize against the
//! principal's grants first, then touch storage, then wrap the result in the
//! JSON envelope. Errors propagate with `?` and map to statuses in
//! `envelope::ApiError`.

pub mod business;
pub mod catalog;
pub mod departments;
pub mod finance;
pub mod inventory;
pub mod navigation;
pub mod parties;
pub mod pos;
pub mod purchasing;
pub mod staff;
pub mod system;

use axum::Router;
use axum::routing::{get, post};

use crate::app::envelope::ApiError;

/// The authenticated router. `/health` lives outside it.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/navigation", get(navigation::tree))
        .route(
            "/business",
            post(business::provision)
                .get(business::profile)
                .patch(business::update_settings),
        )
        .route(
            "/customers",
            get(parties::list_customers).post(parties::create_customer),
        )
        .route(
            "/customers/:id",
            get(parties::get_customer).patch(parties::update_customer),
        )
        .route("/customers/:id/archive", post(parties::archive_customer))
        .route(
            "/suppliers",
            get(parties::list_suppliers).post(parties::create_supplier),
        )
        .route(
            "/suppliers/:id",
            get(parties::get_supplier).patch(parties::update_supplier),
        )
        .route("/suppliers/:id/archive", post(parties::archive_supplier))
        .route(
            "/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/departments/:id",
            get(departments::get)
                .patch(departments::update)
                .delete(departments::remove),
        )
        .route("/staff", get(staff::list).post(staff::hire))
        .route("/staff/:id", get(staff::get).patch(staff::update))
        .route("/staff/:id/deactivate", post(staff::deactivate))
        .route("/staff/:id/reactivate", post(staff::reactivate))
        .route(
            "/services",
            get(catalog::list_services).post(catalog::create_service),
        )
        .route(
            "/services/:id",
            get(catalog::get_service).patch(catalog::update_service),
        )
        .route("/services/:id/retire", post(catalog::retire_service))
        .route(
            "/packages",
            get(catalog::list_packages).post(catalog::create_package),
        )
        .route("/packages/:id", get(catalog::get_package))
        .route("/packages/:id/reprice", post(catalog::reprice_package))
        .route("/packages/:id/retire", post(catalog::retire_package))
        .route(
            "/inventory/items",
            get(inventory::list).post(inventory::create),
        )
        .route("/inventory/low-stock", get(inventory::low_stock))
        .route(
            "/inventory/items/:id",
            get(inventory::get)
                .patch(inventory::update)
                .delete(inventory::remove),
        )
        .route("/inventory/items/:id/adjust", post(inventory::adjust))
        .route(
            "/wallets",
            get(finance::list_wallets).post(finance::open_wallet),
        )
        .route("/wallets/:id", get(finance::get_wallet))
        .route("/wallets/:id/deposit", post(finance::deposit))
        .route("/wallets/:id/withdraw", post(finance::withdraw))
        .route(
            "/expenses",
            get(finance::list_expenses).post(finance::record_expense),
        )
        .route("/expenses/:id", get(finance::get_expense))
        .route(
            "/purchase-orders",
            get(purchasing::list).post(purchasing::create_draft),
        )
        .route("/purchase-orders/:id", get(purchasing::get))
        .route("/purchase-orders/:id/lines", post(purchasing::add_line))
        .route(
            "/purchase-orders/:id/lines/:line_no",
            axum::routing::delete(purchasing::remove_line),
        )
        .route("/purchase-orders/:id/submit", post(purchasing::submit))
        .route("/purchase-orders/:id/receive", post(purchasing::receive))
        .route("/purchase-orders/:id/cancel", post(purchasing::cancel))
        .route("/pos/sales", get(pos::list).post(pos::checkout))
        .route("/pos/sales/:id", get(pos::get))
        .route("/pos/sales/:id/refund", post(pos::refund))
}

/// Unwrap a store lookup, turning `None` into a 404 envelope.
pub(crate) fn found<T>(value: Option<T>, what: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::not_found(format!("{what} not found")))
}
