//! Update Order Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use souk_app::domain::orders::data::OrderUpdate;

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{OrderResponse, OrderStatusBody, PaymentStatusBody},
    },
    state::State,
};

/// Update Order Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    pub status: Option<OrderStatusBody>,
    pub payment_status: Option<PaymentStatusBody>,
    pub payment_reference: Option<String>,

    /// RFC 3339 timestamp
    #[salvo(schema(value_type = Option<String>))]
    pub expected_delivery_at: Option<Timestamp>,

    pub notes: Option<String>,
}

impl From<UpdateOrderRequest> for OrderUpdate {
    fn from(request: UpdateOrderRequest) -> Self {
        OrderUpdate {
            status: request.status.map(Into::into),
            payment_status: request.payment_status.map(Into::into),
            payment_reference: request.payment_reference,
            expected_delivery_at: request.expected_delivery_at,
            notes: request.notes,
        }
    }
}

/// Update Order Handler
///
/// Administrative update of status, payment status, payment reference, expected
/// delivery and notes. Use the cancel endpoint to cancel.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Transition not allowed"),
        (status_code = StatusCode::FORBIDDEN, description = "Administrator access required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(order, json, depot),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let requester = depot.requester_or_401()?;
    let order = order.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(requester.user));
    span.record("order_uuid", tracing::field::display(order));

    let updated = state
        .app
        .orders
        .update_order(requester, order.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use souk_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::OrderUuid,
        status::{OrderStatus, PaymentStatus, TransitionError},
    };

    use crate::test_helpers::{TEST_ADMIN, TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(
            orders,
            TEST_ADMIN,
            Router::with_path("orders/{order}").patch(handler),
        )
    }

    #[tokio::test]
    async fn test_update_order_success() -> TestResult {
        let uuid = OrderUuid::new();
        let delivery: Timestamp = "2026-11-01T12:00:00Z".parse()?;

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .withf(move |requester, u, update| {
                *requester == TEST_ADMIN
                    && *u == uuid
                    && *update
                        == OrderUpdate {
                            status: Some(OrderStatus::Shipped),
                            payment_status: Some(PaymentStatus::Paid),
                            payment_reference: Some("pi_123".to_string()),
                            expected_delivery_at: Some(delivery),
                            notes: None,
                        }
            })
            .return_once(move |_, _, _| {
                let mut order = make_order(uuid);

                order.status = OrderStatus::Shipped;
                order.payment_status = PaymentStatus::Paid;
                order.payment_reference = Some("pi_123".to_string());
                order.expected_delivery_at = Some(delivery);

                Ok(order)
            });

        let mut res = TestClient::patch(format!("http://example.com/orders/{uuid}"))
            .json(&json!({
                "status": "shipped",
                "payment_status": "paid",
                "payment_reference": "pi_123",
                "expected_delivery_at": "2026-11-01T12:00:00Z"
            }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, OrderStatusBody::Shipped);
        assert_eq!(body.payment_reference.as_deref(), Some("pi_123"));
        assert_eq!(body.expected_delivery_at, Some(delivery.to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_unknown_status_returns_400() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_update_order().never();

        let res = TestClient::patch(format!("http://example.com/orders/{uuid}"))
            .json(&json!({ "status": "lost" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_rejected_transition_returns_400() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .return_once(|_, _, _| Err(TransitionError::CancelThroughUpdate.into()));

        let res = TestClient::patch(format!("http://example.com/orders/{uuid}"))
            .json(&json!({ "status": "cancelled" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_as_customer_returns_403() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_order()
            .once()
            .withf(|requester, _, _| *requester == TEST_CUSTOMER)
            .return_once(|_, _, _| Err(OrdersServiceError::Forbidden));

        let res = TestClient::patch(format!("http://example.com/orders/{uuid}"))
            .json(&json!({ "status": "processing" }))
            .send(&orders_service(
                orders,
                TEST_CUSTOMER,
                Router::with_path("orders/{order}").patch(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
