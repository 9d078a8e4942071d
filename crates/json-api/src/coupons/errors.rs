//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use souk_app::domain::coupons::CouponsServiceError;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon code already exists")
        }
        CouponsServiceError::NotFound => StatusError::not_found().brief("Coupon not found"),
        CouponsServiceError::MissingRequiredData | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::InvalidPercentage | CouponsServiceError::InvalidWindow => {
            StatusError::bad_request().brief(error.to_string())
        }
        CouponsServiceError::Forbidden => {
            StatusError::forbidden().brief("Administrator access required")
        }
        CouponsServiceError::Sql(source) => {
            error!("coupon storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
