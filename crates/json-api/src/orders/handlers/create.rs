//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use souk_app::domain::orders::{
    data::{NewOrder, NewOrderItem},
    records::OrderUuid,
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Requested line item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemRequest {
    pub product: Uuid,

    /// At least 1
    pub quantity: u32,

    /// Selected product options, stored with the line item as given
    #[salvo(schema(value_type = Option<Object>))]
    pub options: Option<Value>,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Client-chosen identifier, generated when omitted
    pub uuid: Option<Uuid>,
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: Uuid,

    /// Defaults to the shipping address
    pub billing_address: Option<Uuid>,

    pub payment_method: Uuid,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: request.uuid.map_or_else(OrderUuid::new, OrderUuid::from_uuid),
            items: request
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product: item.product.into(),
                    quantity: item.quantity,
                    options: item.options,
                })
                .collect(),
            shipping_address: request.shipping_address.into(),
            billing_address: request.billing_address.map(Into::into),
            payment_method: request.payment_method.into(),
            coupon_code: request.coupon_code,
            notes: request.notes,
        }
    }
}

/// Create Order Handler
///
/// Places an order for the caller: reserves stock, redeems the coupon if any and
/// returns the priced order.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or business rule violated"),
        (status_code = StatusCode::NOT_FOUND, description = "Referenced product, address, payment method or coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Order number collision"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let requester = depot.requester_or_401()?;

    let order = state
        .app
        .orders
        .create_order(requester, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::ACCEPT,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use souk_app::domain::{
        orders::{MockOrdersService, OrdersServiceError},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER, make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, TEST_CUSTOMER, Router::with_path("orders").post(handler))
    }

    fn payload(product: ProductUuid, quantity: u32) -> Value {
        json!({
            "items": [{ "product": product.into_uuid(), "quantity": quantity, "options": { "size": "M" } }],
            "shipping_address": Uuid::from_u128(10),
            "payment_method": Uuid::from_u128(11),
            "coupon_code": "SAVE10"
        })
    }

    #[tokio::test]
    async fn test_create_order_success() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |requester, order| {
                *requester == TEST_CUSTOMER
                    && order.items.len() == 1
                    && order.items[0].product == product
                    && order.items[0].quantity == 2
                    && order.items[0].options == Some(json!({ "size": "M" }))
                    && order.billing_address.is_none()
                    && order.coupon_code.as_deref() == Some("SAVE10")
            })
            .return_once(|_, order| Ok(make_order(order.uuid)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&payload(product, 2))
            .send(&make_service(orders))
            .await;

        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{}", body.uuid)));
        assert_eq!(body.subtotal, 2500);
        assert_eq!(body.tax, 250);
        assert_eq!(body.shipping_cost, 1000);
        assert_eq!(body.total, 3750);
        assert_eq!(body.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_insufficient_stock_returns_400_with_reason() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(move |_, _| {
            Err(OrdersServiceError::InsufficientStock {
                product,
                available: 1,
                requested: 2,
            })
        });

        let mut res = TestClient::post("http://example.com/orders")
            .add_header(ACCEPT, "application/json", true)
            .json(&payload(product, 2))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        let body = res.take_string().await?;

        assert!(
            body.contains("insufficient stock"),
            "expected reason in body, got {body}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_coupon_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::CouponNotFound("SAVE10".to_string())));

        let res = TestClient::post("http://example.com/orders")
            .json(&payload(ProductUuid::new(), 1))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_empty_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|_, order| order.items.is_empty())
            .return_once(|_, _| Err(OrdersServiceError::EmptyOrder));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "items": [],
                "shipping_address": Uuid::from_u128(10),
                "payment_method": Uuid::from_u128(11)
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_malformed_body_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "items": "lots" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_number_conflict_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::Conflict));

        let res = TestClient::post("http://example.com/orders")
            .json(&payload(ProductUuid::new(), 1))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
