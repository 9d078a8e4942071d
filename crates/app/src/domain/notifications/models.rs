//! Notification payloads.

use serde::Serialize;

use crate::domain::orders::records::OrderRecord;

/// What a customer is told about a freshly placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_number: String,
    pub lines: Vec<OrderSummaryLine>,
    pub subtotal: u64,
    pub tax: u64,
    pub shipping_cost: u64,
    pub discount: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummaryLine {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub subtotal: u64,
}

impl From<&OrderRecord> for OrderSummary {
    fn from(order: &OrderRecord) -> Self {
        Self {
            order_number: order.order_number.clone(),
            lines: order
                .items
                .iter()
                .map(|item| OrderSummaryLine {
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                })
                .collect(),
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_cost: order.shipping_cost,
            discount: order.discount,
            total: order.total,
        }
    }
}
