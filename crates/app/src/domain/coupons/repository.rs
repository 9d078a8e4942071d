//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::domain::{
    amounts::{
        try_get_optional_amount, try_get_quantity, try_i32_from_u32, try_optional_i64_from_u64,
    },
    coupons::{
        data::NewCoupon,
        records::{CouponDiscount, CouponRecord, CouponUuid},
    },
    users::records::UserUuid,
};

const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const GET_COUPON_BY_CODE_SQL: &str = include_str!("sql/get_coupon_by_code.sql");
const LOCK_COUPON_BY_CODE_SQL: &str = include_str!("sql/lock_coupon_by_code.sql");
const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const COUNT_USER_REDEMPTIONS_SQL: &str = include_str!("sql/count_user_redemptions.sql");
const INCREMENT_USAGE_SQL: &str = include_str!("sql/increment_usage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let (percentage, amount) = to_discount_sql_values(coupon.discount)?;

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(coupon.description.as_deref())
            .bind(coupon.discount.type_as_str())
            .bind(percentage)
            .bind(amount)
            .bind(try_optional_i64_from_u64(
                coupon.minimum_order_amount,
                "minimum_order_amount",
            )?)
            .bind(try_optional_i64_from_u64(
                coupon.maximum_discount_amount,
                "maximum_discount_amount",
            )?)
            .bind(SqlxTimestamp::from(coupon.starts_at))
            .bind(SqlxTimestamp::from(coupon.ends_at))
            .bind(coupon.active)
            .bind(try_i32_from_u32(
                coupon.usage_limit_per_user,
                "usage_limit_per_user",
            )?)
            .bind(try_i32_from_u32(coupon.total_usage_limit, "total_usage_limit")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch a coupon by code and hold its row lock until the transaction ends.
    pub(crate) async fn lock_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Number of orders `user` has placed with `code`.
    pub(crate) async fn count_user_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
        user: UserUuid,
    ) -> Result<u32, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_REDEMPTIONS_SQL)
            .bind(code)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u32, sqlx::Error> {
        let usage_count: i32 = query_scalar(INCREMENT_USAGE_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u32::try_from(usage_count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "usage_count".to_string(),
            source: Box::new(e),
        })
    }
}

fn to_discount_sql_values(
    discount: CouponDiscount,
) -> Result<(Option<Decimal>, Option<i64>), sqlx::Error> {
    match discount {
        CouponDiscount::Percentage(percentage) => Ok((Some(percentage), None)),
        CouponDiscount::Fixed(amount) => {
            Ok((None, try_optional_i64_from_u64(Some(amount), "amount")?))
        }
        CouponDiscount::FreeShipping => Ok((None, None)),
    }
}

fn discount_from_row(row: &PgRow) -> Result<CouponDiscount, sqlx::Error> {
    let discount_type: String = row.try_get("discount_type")?;

    let invalid = |reason: &str| sqlx::Error::ColumnDecode {
        index: "discount_type".to_string(),
        source: format!("{reason}: {discount_type}").into(),
    };

    match discount_type.as_str() {
        "percentage" => row
            .try_get::<Option<Decimal>, _>("percentage")?
            .map(CouponDiscount::Percentage)
            .ok_or_else(|| invalid("missing percentage")),
        "fixed" => try_get_optional_amount(row, "amount")?
            .map(CouponDiscount::Fixed)
            .ok_or_else(|| invalid("missing amount")),
        "free_shipping" => Ok(CouponDiscount::FreeShipping),
        _ => Err(invalid("unknown discount type")),
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            discount: discount_from_row(row)?,
            minimum_order_amount: try_get_optional_amount(row, "minimum_order_amount")?,
            maximum_discount_amount: try_get_optional_amount(row, "maximum_discount_amount")?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            active: row.try_get("active")?,
            usage_limit_per_user: try_get_quantity(row, "usage_limit_per_user")?,
            total_usage_limit: try_get_quantity(row, "total_usage_limit")?,
            usage_count: try_get_quantity(row, "usage_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
