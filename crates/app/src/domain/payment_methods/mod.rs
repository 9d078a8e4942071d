//! Payment Methods

pub mod records;
mod repository;

pub(crate) use repository::PgPaymentMethodsRepository;
