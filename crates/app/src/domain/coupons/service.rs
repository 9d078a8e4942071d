//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        coupons::{
            data::NewCoupon,
            errors::CouponsServiceError,
            records::{CouponDiscount, CouponRecord},
            repository::PgCouponsRepository,
        },
        users::records::Requester,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

fn validate_new_coupon(coupon: &NewCoupon) -> Result<(), CouponsServiceError> {
    if coupon.code.trim().is_empty() {
        return Err(CouponsServiceError::MissingRequiredData);
    }

    if let CouponDiscount::Percentage(percentage) = coupon.discount
        && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percentage)
    {
        return Err(CouponsServiceError::InvalidPercentage);
    }

    if coupon.starts_at >= coupon.ends_at {
        return Err(CouponsServiceError::InvalidWindow);
    }

    Ok(())
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(
            user_uuid = %requester.user,
            coupon_uuid = %coupon.uuid,
            discount_type = coupon.discount.type_as_str()
        ),
        err
    )]
    async fn create_coupon(
        &self,
        requester: Requester,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, CouponsServiceError> {
        if !requester.is_admin() {
            return Err(CouponsServiceError::Forbidden);
        }

        validate_new_coupon(&coupon)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon).await?;

        tx.commit().await?;

        info!(coupon_uuid = %created.uuid, code = %created.code, "created coupon");

        Ok(created)
    }

    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupon = self.repository.get_coupon_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a coupon. Administrators only.
    async fn create_coupon(
        &self,
        requester: Requester,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a coupon by its code.
    async fn get_coupon(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieves all coupons, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_coupon};

    use super::*;

    #[tokio::test]
    async fn create_coupon_round_trips_discount_kinds() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;

        for (code, discount) in [
            ("PCT10", CouponDiscount::Percentage(dec!(10))),
            ("FIVER", CouponDiscount::Fixed(500)),
            ("SHIPFREE", CouponDiscount::FreeShipping),
        ] {
            ctx.coupons
                .create_coupon(admin, new_coupon(code, discount))
                .await?;

            let fetched = ctx.coupons.get_coupon(code).await?;

            assert_eq!(fetched.discount, discount);
            assert_eq!(fetched.usage_count, 0);
        }

        let coupons = ctx.coupons.list_coupons().await?;

        assert_eq!(coupons.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_rejects_percentage_over_one_hundred() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;

        let result = ctx
            .coupons
            .create_coupon(
                admin,
                new_coupon("TOOMUCH", CouponDiscount::Percentage(dec!(100.01))),
            )
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidPercentage)),
            "expected InvalidPercentage, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_rejects_inverted_window() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;

        let mut coupon = new_coupon("BACKWARDS", CouponDiscount::Fixed(100));
        coupon.ends_at = Timestamp::now() - 1.hour();
        coupon.starts_at = Timestamp::now();

        let result = ctx.coupons.create_coupon(admin, coupon).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidWindow)),
            "expected InvalidWindow, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_duplicate_code_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.create_admin().await;

        ctx.coupons
            .create_coupon(admin, new_coupon("DUP", CouponDiscount::Fixed(100)))
            .await?;

        let result = ctx
            .coupons
            .create_coupon(admin, new_coupon("DUP", CouponDiscount::Fixed(200)))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_requires_admin() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;

        let result = ctx
            .coupons
            .create_coupon(customer, new_coupon("NOPE", CouponDiscount::Fixed(100)))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_coupon_unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.coupons.get_coupon("MISSING").await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
