//! Order Records

use jiff::Timestamp;
use serde_json::Value;

use crate::{
    domain::{
        addresses::records::AddressUuid,
        orders::status::{OrderStatus, PaymentStatus},
        payment_methods::records::PaymentMethodUuid,
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub shipping_address_uuid: AddressUuid,
    pub billing_address_uuid: AddressUuid,
    pub payment_method_uuid: PaymentMethodUuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub discount: u64,
    pub total: u64,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
    pub expected_delivery_at: Option<Timestamp>,
    pub items: Vec<OrderItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
///
/// Snapshot of the product at the time the order was placed.
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub product_image: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
    pub options: Option<Value>,
    pub created_at: Timestamp,
}
