//! Test Helpers

use jiff::{Timestamp, ToSpan};

use crate::domain::{
    addresses::records::AddressUuid,
    coupons::{
        data::NewCoupon,
        records::{CouponDiscount, CouponUuid},
    },
    orders::data::{NewOrder, NewOrderItem},
    orders::records::OrderUuid,
    payment_methods::records::PaymentMethodUuid,
    products::{data::NewProduct, records::ProductUuid},
};

pub(crate) fn new_product(price: u64, available: u32) -> NewProduct {
    let uuid = ProductUuid::new();

    NewProduct {
        uuid,
        name: format!("Product {uuid}"),
        sku: None,
        image_url: format!("https://cdn.example.com/products/{uuid}.jpg"),
        price,
        discount_price: None,
        available,
    }
}

/// An active, unlimited coupon valid for the next day.
pub(crate) fn new_coupon(code: &str, discount: CouponDiscount) -> NewCoupon {
    let now = Timestamp::now();

    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        description: None,
        discount,
        minimum_order_amount: None,
        maximum_discount_amount: None,
        starts_at: now - 1.hour(),
        ends_at: now + 24.hours(),
        active: true,
        usage_limit_per_user: 0,
        total_usage_limit: 0,
    }
}

pub(crate) fn new_order(
    items: &[(ProductUuid, u32)],
    address: AddressUuid,
    payment_method: PaymentMethodUuid,
) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        items: items
            .iter()
            .map(|(product, quantity)| NewOrderItem {
                product: *product,
                quantity: *quantity,
                options: None,
            })
            .collect(),
        shipping_address: address,
        billing_address: None,
        payment_method,
        coupon_code: None,
        notes: None,
    }
}
