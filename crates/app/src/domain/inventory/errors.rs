//! Inventory errors.

use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: ProductUuid,
        available: u32,
        requested: u32,
    },

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
