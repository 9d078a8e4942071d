//! Get Order By Number Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order By Number Handler
///
/// Looks an order up by its human-readable number, e.g. `ORD-00123456-0042`.
#[endpoint(
    tags("orders"),
    summary = "Get Order By Number",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    number: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let requester = depot.requester_or_401()?;

    let order = state
        .app
        .orders
        .get_order_by_number(requester, &number.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
