//! Order Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use souk_app::domain::orders::data::OrdersFilter;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{OrderResponse, OrderStatusBody, PaymentStatusBody},
    },
    state::State,
};

/// Response header carrying the number of matching orders before pagination.
pub(crate) const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Matching orders, newest first
    pub orders: Vec<OrderResponse>,
}

fn parse_timestamp(
    value: QueryParam<String, false>,
    name: &str,
) -> Result<Option<Timestamp>, StatusError> {
    value
        .into_inner()
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400(&format!("could not parse \"{name}\" query parameter"))
}

/// Order Index Handler
///
/// Lists orders matching the query. Customers only ever see their own orders.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Matching orders, total in X-Total-Count"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[expect(
    clippy::too_many_arguments,
    reason = "one extractor per documented query parameter"
)]
pub(crate) async fn handler(
    user: QueryParam<Uuid, false>,
    status: QueryParam<OrderStatusBody, false>,
    payment_status: QueryParam<PaymentStatusBody, false>,
    created_from: QueryParam<String, false>,
    created_to: QueryParam<String, false>,
    min_total: QueryParam<u64, false>,
    max_total: QueryParam<u64, false>,
    offset: QueryParam<u64, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let requester = depot.requester_or_401()?;

    let filter = OrdersFilter {
        user: user.into_inner().map(Into::into),
        status: status.into_inner().map(Into::into),
        payment_status: payment_status.into_inner().map(Into::into),
        created_from: parse_timestamp(created_from, "created_from")?,
        created_to: parse_timestamp(created_to, "created_to")?,
        min_total: min_total.into_inner(),
        max_total: max_total.into_inner(),
        offset: offset.into_inner().unwrap_or_default(),
        limit: limit.into_inner(),
    };

    let total = state
        .app
        .orders
        .count_orders(requester, filter.clone())
        .await
        .map_err(into_status_error)?;

    let orders = state
        .app
        .orders
        .list_orders(requester, filter)
        .await
        .map_err(into_status_error)?;

    res.add_header(TOTAL_COUNT_HEADER, total.to_string(), true)
        .or_500("failed to set total count header")?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use souk_app::domain::orders::{
        MockOrdersService,
        records::OrderUuid,
        status::{OrderStatus, PaymentStatus},
    };

    use crate::test_helpers::{TEST_ADMIN, TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, TEST_CUSTOMER, Router::with_path("orders").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_orders_and_total_count() -> TestResult {
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_count_orders()
            .once()
            .withf(|requester, filter| {
                *requester == TEST_CUSTOMER && *filter == OrdersFilter::default()
            })
            .return_once(|_, _| Ok(12));

        orders
            .expect_list_orders()
            .once()
            .withf(|requester, filter| {
                *requester == TEST_CUSTOMER && *filter == OrdersFilter::default()
            })
            .return_once(move |_, _| Ok(vec![make_order(first), make_order(second)]));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        let total = res
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(total.as_deref(), Some("12"));
        assert_eq!(body.orders.len(), 2, "expected two orders");
        assert_eq!(body.orders[0].uuid, first.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_query_filter() -> TestResult {
        let user = Uuid::from_u128(42);
        let from: Timestamp = "2026-01-01T00:00:00Z".parse()?;

        let expected = OrdersFilter {
            user: Some(user.into()),
            status: Some(OrderStatus::Shipped),
            payment_status: Some(PaymentStatus::Paid),
            created_from: Some(from),
            created_to: None,
            min_total: Some(1000),
            max_total: Some(5000),
            offset: 20,
            limit: Some(10),
        };

        let count_expected = expected.clone();

        let mut orders = MockOrdersService::new();

        orders
            .expect_count_orders()
            .once()
            .withf(move |_, filter| *filter == count_expected)
            .return_once(|_, _| Ok(0));

        orders
            .expect_list_orders()
            .once()
            .withf(move |requester, filter| *requester == TEST_ADMIN && *filter == expected)
            .return_once(|_, _| Ok(vec![]));

        let res = TestClient::get(format!(
            "http://example.com/orders?user={user}&status=shipped&payment_status=paid\
             &created_from=2026-01-01T00:00:00Z&min_total=1000&max_total=5000&offset=20&limit=10"
        ))
        .send(&orders_service(
            orders,
            TEST_ADMIN,
            Router::with_path("orders").get(handler),
        ))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_invalid_timestamp_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_count_orders().never();
        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?created_to=yesterday")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
