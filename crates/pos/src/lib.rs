//! `bizgrid-pos` — point-of-sale checkout.

pub mod sale;

pub use sale::{PaymentMethod, Sale, SaleLine, SaleLineRef, SaleStatus};
