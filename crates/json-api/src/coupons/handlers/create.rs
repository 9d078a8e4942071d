//! Create Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use souk_app::domain::coupons::{
    data::NewCoupon,
    records::{CouponDiscount, CouponUuid},
};

use crate::{
    coupons::{
        errors::into_status_error,
        models::{CouponResponse, DiscountType},
    },
    extensions::*,
    state::State,
};

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCouponRequest {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,

    /// Required for percentage coupons, `0..=100`
    #[salvo(schema(value_type = Option<String>))]
    pub percentage: Option<Decimal>,

    /// Required for fixed coupons, in minor currency units
    pub amount: Option<u64>,

    pub minimum_order_amount: Option<u64>,
    pub maximum_discount_amount: Option<u64>,

    /// RFC 3339 timestamp
    #[salvo(schema(value_type = String))]
    pub starts_at: Timestamp,

    /// RFC 3339 timestamp, after `starts_at`
    #[salvo(schema(value_type = String))]
    pub ends_at: Timestamp,

    #[serde(default = "default_active")]
    pub active: bool,

    /// `0` for unlimited
    #[serde(default)]
    pub usage_limit_per_user: u32,

    /// `0` for unlimited
    #[serde(default)]
    pub total_usage_limit: u32,
}

const fn default_active() -> bool {
    true
}

impl TryFrom<CreateCouponRequest> for NewCoupon {
    type Error = StatusError;

    fn try_from(request: CreateCouponRequest) -> Result<Self, Self::Error> {
        let discount = match (request.discount_type, request.percentage, request.amount) {
            (DiscountType::Percentage, Some(percentage), None) => {
                CouponDiscount::Percentage(percentage)
            }
            (DiscountType::Fixed, None, Some(amount)) => CouponDiscount::Fixed(amount),
            (DiscountType::FreeShipping, None, None) => CouponDiscount::FreeShipping,
            _ => {
                return Err(StatusError::bad_request()
                    .brief("percentage coupons need only `percentage`, fixed coupons only `amount`"));
            }
        };

        Ok(NewCoupon {
            uuid: CouponUuid::new(),
            code: request.code,
            description: request.description,
            discount,
            minimum_order_amount: request.minimum_order_amount,
            maximum_discount_amount: request.maximum_discount_amount,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            active: request.active,
            usage_limit_per_user: request.usage_limit_per_user,
            total_usage_limit: request.total_usage_limit,
        })
    }
}

/// Create Coupon Handler
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let requester = depot.requester_or_401()?;
    let coupon = NewCoupon::try_from(json.into_inner())?;

    let created = state
        .app
        .coupons
        .create_coupon(requester, coupon)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", created.code), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use souk_app::domain::coupons::{CouponsServiceError, MockCouponsService};

    use crate::test_helpers::{TEST_ADMIN, TEST_CUSTOMER, coupons_service, make_coupon};

    use super::*;

    fn make_service(coupons: MockCouponsService) -> Service {
        coupons_service(coupons, TEST_ADMIN, Router::with_path("coupons").post(handler))
    }

    #[tokio::test]
    async fn test_create_percentage_coupon_success() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .withf(|requester, coupon| {
                *requester == TEST_ADMIN
                    && coupon.code == "SAVE10"
                    && coupon.discount == CouponDiscount::Percentage(dec!(10))
                    && coupon.active
                    && coupon.usage_limit_per_user == 0
            })
            .return_once(|_, coupon| Ok(make_coupon(&coupon.code, coupon.discount)));

        let mut res = TestClient::post("http://example.com/coupons")
            .json(&json!({
                "code": "SAVE10",
                "discount_type": "percentage",
                "percentage": "10",
                "starts_at": "2026-01-01T00:00:00Z",
                "ends_at": "2026-12-31T00:00:00Z"
            }))
            .send(&make_service(coupons))
            .await;

        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body: CouponResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location.as_deref(), Some("/coupons/SAVE10"));
        assert_eq!(body.discount_type, DiscountType::Percentage);
        assert_eq!(body.percentage, Some(dec!(10)));
        assert_eq!(body.amount, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_with_mismatched_value_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_create_coupon().never();

        let res = TestClient::post("http://example.com/coupons")
            .json(&json!({
                "code": "BROKEN",
                "discount_type": "fixed",
                "percentage": "10",
                "starts_at": "2026-01-01T00:00:00Z",
                "ends_at": "2026-12-31T00:00:00Z"
            }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_duplicate_code_returns_409() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/coupons")
            .json(&json!({
                "code": "DUP",
                "discount_type": "free_shipping",
                "starts_at": "2026-01-01T00:00:00Z",
                "ends_at": "2026-12-31T00:00:00Z"
            }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_as_customer_returns_403() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .withf(|requester, _| *requester == TEST_CUSTOMER)
            .return_once(|_, _| Err(CouponsServiceError::Forbidden));

        let res = TestClient::post("http://example.com/coupons")
            .json(&json!({
                "code": "NOPE",
                "discount_type": "fixed",
                "amount": 500,
                "starts_at": "2026-01-01T00:00:00Z",
                "ends_at": "2026-12-31T00:00:00Z"
            }))
            .send(&coupons_service(
                coupons,
                TEST_CUSTOMER,
                Router::with_path("coupons").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_coupon_invalid_window_returns_400() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons
            .expect_create_coupon()
            .once()
            .return_once(|_, _| Err(CouponsServiceError::InvalidWindow));

        let res = TestClient::post("http://example.com/coupons")
            .json(&json!({
                "code": "BACKWARDS",
                "discount_type": "fixed",
                "amount": 500,
                "starts_at": "2026-12-31T00:00:00Z",
                "ends_at": "2026-01-01T00:00:00Z"
            }))
            .send(&make_service(coupons))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
