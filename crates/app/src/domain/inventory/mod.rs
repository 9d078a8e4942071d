//! Inventory

mod errors;
mod ledger;

pub use errors::InventoryError;
pub(crate) use ledger::{PgInventoryLedger, ensure_available};
