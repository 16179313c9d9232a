//! `bizgrid-finance` — wallets and expenses.

pub mod expense;
pub mod wallet;

pub use expense::Expense;
pub use wallet::Wallet;
