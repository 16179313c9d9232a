//! `bizgrid-catalog` — sellable services and service packages.

pub mod package;
pub mod service;

pub use package::{Package, PackageLine};
pub use service::Service;
