//! `bizgrid-inventory` — stocked items.

pub mod item;

pub use item::Item;
