//! Order Errors
//!
//! Business-rule failures carry their reason in the response brief so clients can tell
//! which product ran out or which coupon rule failed.

use salvo::http::StatusError;
use tracing::error;

use souk_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyOrder
        | OrdersServiceError::Validation(_)
        | OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::CouponInactive(_)
        | OrdersServiceError::CouponExhausted(_)
        | OrdersServiceError::CouponMinimumNotMet { .. }
        | OrdersServiceError::InvalidState(_)
        | OrdersServiceError::Pricing(_) => StatusError::bad_request().brief(error.to_string()),
        OrdersServiceError::ProductNotFound(_)
        | OrdersServiceError::AddressNotFound(_)
        | OrdersServiceError::PaymentMethodNotFound(_)
        | OrdersServiceError::CouponNotFound(_) => {
            StatusError::not_found().brief(error.to_string())
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to act on this order")
        }
        OrdersServiceError::Conflict => {
            StatusError::conflict().brief("Could not allocate a unique order number")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use souk_app::domain::{
        coupons::CouponError,
        orders::status::{OrderStatus, TransitionError},
        pricing::PricingError,
        products::records::ProductUuid,
    };

    use super::*;

    #[test]
    fn every_error_maps_to_its_status() {
        let product = ProductUuid::new();

        let cases = [
            (OrdersServiceError::EmptyOrder, StatusCode::BAD_REQUEST),
            (
                OrdersServiceError::Validation("quantity must be at least 1".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::InsufficientStock {
                    product,
                    available: 1,
                    requested: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::CouponInactive("OLD".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::CouponExhausted(CouponError::Exhausted {
                    code: "GONE".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::CouponMinimumNotMet {
                    code: "BIG".to_string(),
                    minimum: 5000,
                    subtotal: 2500,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::InvalidState(TransitionError::NotCancellable(
                    OrderStatus::Delivered,
                )),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::Pricing(PricingError::Overflow),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrdersServiceError::ProductNotFound(product),
                StatusCode::NOT_FOUND,
            ),
            (
                OrdersServiceError::CouponNotFound("NOPE".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (OrdersServiceError::NotFound, StatusCode::NOT_FOUND),
            (OrdersServiceError::Forbidden, StatusCode::FORBIDDEN),
            (OrdersServiceError::Conflict, StatusCode::CONFLICT),
            (OrdersServiceError::InvalidData, StatusCode::BAD_REQUEST),
            (
                OrdersServiceError::Sql(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let label = format!("{error:?}");

            assert_eq!(into_status_error(error).code, expected, "{label}");
        }
    }

    #[test]
    fn business_errors_keep_their_reason() {
        let product = ProductUuid::new();

        let status = into_status_error(OrdersServiceError::InsufficientStock {
            product,
            available: 1,
            requested: 2,
        });

        assert!(
            status.brief.contains(&product.to_string()),
            "brief should name the product: {}",
            status.brief
        );
        assert!(status.brief.contains("requested 2, available 1"), "{}", status.brief);
    }
}
