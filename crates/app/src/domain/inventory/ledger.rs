//! Inventory Ledger
//!
//! Owns every mutation of `products.available`. All methods run inside a caller-owned
//! transaction; `reserve` and `release` expect the product rows to have been locked with
//! [`PgInventoryLedger::lock_products`] first.

use sqlx::{Postgres, Transaction, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    amounts::try_i32_from_u32,
    inventory::InventoryError,
    products::records::{ProductRecord, ProductUuid},
};

const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");
const RELEASE_STOCK_SQL: &str = include_str!("sql/release_stock.sql");
const GET_AVAILABLE_SQL: &str = include_str!("sql/get_available.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryLedger;

impl PgInventoryLedger {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the given products for update, in ascending uuid order.
    ///
    /// Deleted or unknown products are absent from the result.
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|p| p.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Decrement the available quantity, returning what remains.
    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, InventoryError> {
        let quantity_i32 = try_i32_from_u32(quantity, "available")?;

        let remaining: Option<i32> = query_scalar(RESERVE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(quantity_i32)
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(remaining) = remaining {
            return Ok(u32::try_from(remaining).unwrap_or_default());
        }

        let available: Option<i32> = query_scalar(GET_AVAILABLE_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        match available {
            Some(available) => Err(InventoryError::InsufficientStock {
                product,
                available: u32::try_from(available).unwrap_or_default(),
                requested: quantity,
            }),
            None => Err(InventoryError::ProductNotFound(product)),
        }
    }

    /// Increment the available quantity, returning the new level.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, InventoryError> {
        let quantity_i32 = try_i32_from_u32(quantity, "available")?;

        let available: Option<i32> = query_scalar(RELEASE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(quantity_i32)
            .fetch_optional(&mut **tx)
            .await?;

        available
            .map(|available| u32::try_from(available).unwrap_or_default())
            .ok_or(InventoryError::ProductNotFound(product))
    }
}

/// Check a locked product can cover `requested` units without mutating anything.
pub(crate) fn ensure_available(
    product: &ProductRecord,
    requested: u32,
) -> Result<(), InventoryError> {
    if product.available < requested {
        return Err(InventoryError::InsufficientStock {
            product: product.uuid,
            available: product.available,
            requested,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::ProductsService,
        test::{TestContext, helpers::new_product},
    };

    use super::*;

    #[tokio::test]
    async fn reserve_decrements_and_release_restores() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;
        let product = ctx.products.create_product(admin, new_product(100, 5)).await?;

        let ledger = PgInventoryLedger::new();
        let mut tx = ctx.db.pool().begin().await?;

        let locked = ledger.lock_products(&mut tx, &[product.uuid]).await?;

        assert_eq!(locked.len(), 1);

        assert_eq!(ledger.reserve(&mut tx, product.uuid, 3).await?, 2);
        assert_eq!(ledger.release(&mut tx, product.uuid, 1).await?, 3);

        tx.commit().await?;

        assert_eq!(ctx.products.get_product(product.uuid).await?.available, 3);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_beyond_available_reports_levels_and_leaves_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;
        let product = ctx.products.create_product(admin, new_product(100, 1)).await?;

        let ledger = PgInventoryLedger::new();
        let mut tx = ctx.db.pool().begin().await?;

        let result = ledger.reserve(&mut tx, product.uuid, 2).await;

        assert!(
            matches!(
                result,
                Err(InventoryError::InsufficientStock {
                    available: 1,
                    requested: 2,
                    ..
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        tx.commit().await?;

        assert_eq!(ctx.products.get_product(product.uuid).await?.available, 1);

        Ok(())
    }

    #[tokio::test]
    async fn lock_products_skips_deleted_products() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;
        let kept = ctx.products.create_product(admin, new_product(100, 1)).await?;
        let deleted = ctx.products.create_product(admin, new_product(100, 1)).await?;

        ctx.products.delete_product(admin, deleted.uuid).await?;

        let mut tx = ctx.db.pool().begin().await?;

        let locked = PgInventoryLedger::new()
            .lock_products(&mut tx, &[kept.uuid, deleted.uuid])
            .await?;

        let uuids: Vec<ProductUuid> = locked.iter().map(|p| p.uuid).collect();

        assert_eq!(uuids, vec![kept.uuid]);

        Ok(())
    }
}
