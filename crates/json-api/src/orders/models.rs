//! Order Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use souk_app::domain::orders::{
    records::{OrderItemRecord, OrderRecord},
    status::{OrderStatus, PaymentStatus},
};

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OrderStatusBody {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentStatusBody {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl From<OrderStatus> for OrderStatusBody {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Processing => Self::Processing,
            OrderStatus::Shipped => Self::Shipped,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
            OrderStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<OrderStatusBody> for OrderStatus {
    fn from(status: OrderStatusBody) -> Self {
        match status {
            OrderStatusBody::Pending => Self::Pending,
            OrderStatusBody::Processing => Self::Processing,
            OrderStatusBody::Shipped => Self::Shipped,
            OrderStatusBody::Delivered => Self::Delivered,
            OrderStatusBody::Cancelled => Self::Cancelled,
            OrderStatusBody::Refunded => Self::Refunded,
        }
    }
}

impl From<PaymentStatus> for PaymentStatusBody {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Failed => Self::Failed,
            PaymentStatus::Refunded => Self::Refunded,
        }
    }
}

impl From<PaymentStatusBody> for PaymentStatus {
    fn from(status: PaymentStatusBody) -> Self {
        match status {
            PaymentStatusBody::Pending => Self::Pending,
            PaymentStatusBody::Paid => Self::Paid,
            PaymentStatusBody::Failed => Self::Failed,
            PaymentStatusBody::Refunded => Self::Refunded,
        }
    }
}

/// Line item as snapshotted when the order was placed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub product_image: String,

    /// Unit price charged, in minor currency units
    pub unit_price: u64,

    pub quantity: u32,

    /// `unit_price * quantity`
    pub subtotal: u64,

    #[salvo(schema(value_type = Option<Object>))]
    pub options: Option<Value>,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            product_sku: item.product_sku,
            product_image: item.product_image,
            unit_price: item.unit_price,
            quantity: item.quantity,
            subtotal: item.subtotal,
            options: item.options,
        }
    }
}

/// Order with its totals and line items. Amounts are in minor currency units and
/// `total == subtotal + tax + shipping_cost - discount`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub order_number: String,
    pub user_uuid: Uuid,
    pub shipping_address_uuid: Uuid,
    pub billing_address_uuid: Uuid,
    pub payment_method_uuid: Uuid,
    pub status: OrderStatusBody,
    pub payment_status: PaymentStatusBody,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub discount: u64,
    pub total: u64,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
    pub expected_delivery_at: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number,
            user_uuid: order.user_uuid.into_uuid(),
            shipping_address_uuid: order.shipping_address_uuid.into_uuid(),
            billing_address_uuid: order.billing_address_uuid.into_uuid(),
            payment_method_uuid: order.payment_method_uuid.into_uuid(),
            status: order.status.into(),
            payment_status: order.payment_status.into(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_cost: order.shipping_cost,
            discount: order.discount,
            total: order.total,
            coupon_code: order.coupon_code,
            notes: order.notes,
            payment_reference: order.payment_reference,
            expected_delivery_at: order.expected_delivery_at.as_ref().map(ToString::to_string),
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
