//! Souk Domain Concerns

pub mod addresses;
pub(crate) mod amounts;
pub mod coupons;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod payment_methods;
pub mod pricing;
pub mod products;
pub mod users;
