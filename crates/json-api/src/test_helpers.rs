//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use souk_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        addresses::records::AddressUuid,
        coupons::{
            MockCouponsService,
            records::{CouponDiscount, CouponRecord, CouponUuid},
        },
        orders::{
            MockOrdersService,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
            status::{OrderStatus, PaymentStatus},
        },
        payment_methods::records::PaymentMethodUuid,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{
            MockUsersService,
            records::{Requester, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: Requester =
    Requester::customer(UserUuid::from_uuid(Uuid::from_u128(1)));

pub(crate) const TEST_ADMIN: Requester = Requester::admin(UserUuid::from_uuid(Uuid::from_u128(2)));

/// Stands in for the auth middleware by injecting a fixed requester.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectRequester(pub(crate) Requester);

#[salvo::handler]
impl InjectRequester {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_requester(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

fn strict_coupons_mock() -> MockCouponsService {
    let mut coupons = MockCouponsService::new();

    coupons.expect_create_coupon().never();
    coupons.expect_get_coupon().never();
    coupons.expect_list_coupons().never();

    coupons
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_list_orders().never();
    orders.expect_count_orders().never();
    orders.expect_get_order().never();
    orders.expect_get_order_by_number().never();
    orders.expect_update_order().never();
    orders.expect_cancel_order().never();

    orders
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_create_user().never();
    users.expect_get_user().never();

    users
}

/// An app context where every service call fails the test.
pub(crate) fn strict_app_context() -> AppContext {
    AppContext {
        products: Arc::new(strict_products_mock()),
        coupons: Arc::new(strict_coupons_mock()),
        orders: Arc::new(strict_orders_mock()),
        users: Arc::new(strict_users_mock()),
        auth: Arc::new(strict_auth_mock()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    let mut app = strict_app_context();

    app.auth = Arc::new(auth);

    State::from_app_context(app)
}

/// Serve `route` with `app` injected and `requester` already authenticated.
pub(crate) fn authenticated_service(app: AppContext, requester: Requester, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(InjectRequester(requester))
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    let mut app = strict_app_context();

    app.products = Arc::new(products);

    authenticated_service(app, TEST_ADMIN, route)
}

pub(crate) fn coupons_service(
    coupons: MockCouponsService,
    requester: Requester,
    route: Router,
) -> Service {
    let mut app = strict_app_context();

    app.coupons = Arc::new(coupons);

    authenticated_service(app, requester, route)
}

pub(crate) fn orders_service(
    orders: MockOrdersService,
    requester: Requester,
    route: Router,
) -> Service {
    let mut app = strict_app_context();

    app.orders = Arc::new(orders);

    authenticated_service(app, requester, route)
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Widget".to_string(),
        sku: Some("WID-1".to_string()),
        image_url: "https://cdn.example.com/widget.png".to_string(),
        price: 1000,
        discount_price: None,
        available: 10,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_coupon(code: &str, discount: CouponDiscount) -> CouponRecord {
    CouponRecord {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        description: None,
        discount,
        minimum_order_amount: None,
        maximum_discount_amount: None,
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::MAX,
        active: true,
        usage_limit_per_user: 0,
        total_usage_limit: 0,
        usage_count: 0,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A pending order owned by [`TEST_CUSTOMER`] priced at the reference cart: two units at
/// 1000 and one at 500, 10% tax and 1000 shipping.
pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    let address = AddressUuid::from_uuid(Uuid::from_u128(10));

    OrderRecord {
        uuid,
        order_number: "ORD-00123456-0042".to_string(),
        user_uuid: TEST_CUSTOMER.user,
        shipping_address_uuid: address,
        billing_address_uuid: address,
        payment_method_uuid: PaymentMethodUuid::from_uuid(Uuid::from_u128(11)),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        subtotal: 2500,
        tax: 250,
        shipping_cost: 1000,
        discount: 0,
        total: 3750,
        coupon_code: None,
        notes: None,
        payment_reference: None,
        expected_delivery_at: None,
        items: vec![
            make_order_item(uuid, 1000, 2),
            make_order_item(uuid, 500, 1),
        ],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

fn make_order_item(order: OrderUuid, unit_price: u64, quantity: u32) -> OrderItemRecord {
    OrderItemRecord {
        uuid: OrderItemUuid::new(),
        order_uuid: order,
        product_uuid: ProductUuid::new(),
        product_name: "Widget".to_string(),
        product_sku: None,
        product_image: "https://cdn.example.com/widget.png".to_string(),
        unit_price,
        quantity,
        subtotal: unit_price * u64::from(quantity),
        options: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
