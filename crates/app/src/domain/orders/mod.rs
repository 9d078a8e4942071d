//! Orders

pub mod data;
pub mod errors;
mod number;
pub mod records;
mod repository;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
