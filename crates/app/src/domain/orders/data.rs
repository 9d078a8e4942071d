//! Orders Data

use jiff::Timestamp;
use serde_json::Value;

use crate::domain::{
    addresses::records::AddressUuid,
    orders::{
        records::OrderUuid,
        status::{OrderStatus, PaymentStatus},
    },
    payment_methods::records::PaymentMethodUuid,
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// Page size used when a listing does not ask for one.
pub const DEFAULT_ORDERS_LIMIT: u32 = 50;

/// Largest page size a listing may ask for.
pub const MAX_ORDERS_LIMIT: u32 = 200;

/// New Order Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product: ProductUuid,
    pub quantity: u32,
    pub options: Option<Value>,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub items: Vec<NewOrderItem>,
    pub shipping_address: AddressUuid,

    /// Defaults to the shipping address.
    pub billing_address: Option<AddressUuid>,

    pub payment_method: PaymentMethodUuid,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

/// Administrative Order Update Data
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_reference: Option<String>,
    pub expected_delivery_at: Option<Timestamp>,
    pub notes: Option<String>,
}

/// Orders listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersFilter {
    pub user: Option<UserUuid>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub min_total: Option<u64>,
    pub max_total: Option<u64>,
    pub offset: u64,
    pub limit: Option<u32>,
}

impl OrdersFilter {
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_ORDERS_LIMIT)
            .clamp(1, MAX_ORDERS_LIMIT)
    }
}
