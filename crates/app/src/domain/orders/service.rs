//! Orders service.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        addresses::PgAddressesRepository,
        coupons::{EvaluatedCoupon, PgCouponsRepository, evaluator},
        inventory::{PgInventoryLedger, ensure_available},
        notifications::{NotificationDispatcher, OrderSummary},
        orders::{
            data::{NewOrder, OrderUpdate, OrdersFilter},
            errors::OrdersServiceError,
            number::{MAX_ORDER_NUMBER_ATTEMPTS, generate_order_number},
            records::{OrderItemUuid, OrderRecord, OrderUuid},
            repository::{OrderInsert, OrderItemInsert, PgOrdersRepository},
            status::{
                OrderStatus, PaymentStatus, TransitionError, validate_payment_transition,
                validate_status_transition,
            },
        },
        payment_methods::PgPaymentMethodsRepository,
        pricing::{PricingConfig, PricingLine, line_subtotal, price_order, subtotal},
        products::records::{ProductRecord, ProductUuid},
        users::{PgUsersRepository, records::Requester},
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    ledger: PgInventoryLedger,
    coupons: PgCouponsRepository,
    addresses: PgAddressesRepository,
    payment_methods: PgPaymentMethodsRepository,
    users: PgUsersRepository,
    pricing: PricingConfig,
    dispatcher: NotificationDispatcher,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, pricing: PricingConfig, dispatcher: NotificationDispatcher) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            ledger: PgInventoryLedger::new(),
            coupons: PgCouponsRepository::new(),
            addresses: PgAddressesRepository::new(),
            payment_methods: PgPaymentMethodsRepository::new(),
            users: PgUsersRepository::new(),
            pricing,
            dispatcher,
        }
    }
}

fn validate_new_order(order: &NewOrder) -> Result<(), OrdersServiceError> {
    if order.items.is_empty() {
        return Err(OrdersServiceError::EmptyOrder);
    }

    if let Some(item) = order.items.iter().find(|item| item.quantity == 0) {
        return Err(OrdersServiceError::Validation(format!(
            "quantity for product {} must be at least 1",
            item.product
        )));
    }

    Ok(())
}

/// Total requested quantity per product, in ascending uuid order.
fn requested_quantities(
    order: &NewOrder,
) -> Result<BTreeMap<ProductUuid, u32>, OrdersServiceError> {
    let mut requested: BTreeMap<ProductUuid, u32> = BTreeMap::new();

    for item in &order.items {
        let quantity = requested.entry(item.product).or_default();

        *quantity = quantity.checked_add(item.quantity).ok_or_else(|| {
            OrdersServiceError::Validation(format!(
                "quantity for product {} is too large",
                item.product
            ))
        })?;
    }

    Ok(requested)
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user_uuid = %requester.user,
            order_uuid = %order.uuid,
            item_count = order.items.len(),
            coupon_code = order.coupon_code.as_deref(),
            order_number = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        requester: Requester,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        validate_new_order(&order)?;

        let requested = requested_quantities(&order)?;
        let product_uuids: Vec<ProductUuid> = requested.keys().copied().collect();

        let mut tx = self.db.begin_transaction().await?;

        let customer = self.users.get_user(&mut tx, requester.user).await?;

        let locked = self.ledger.lock_products(&mut tx, &product_uuids).await?;

        let products: BTreeMap<ProductUuid, ProductRecord> = locked
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        for (uuid, quantity) in &requested {
            let product = products
                .get(uuid)
                .ok_or(OrdersServiceError::ProductNotFound(*uuid))?;

            ensure_available(product, *quantity)?;
        }

        let billing_address = order.billing_address.unwrap_or(order.shipping_address);

        for address in [order.shipping_address, billing_address] {
            self.addresses
                .find_owned(&mut tx, address, requester.user)
                .await?
                .ok_or(OrdersServiceError::AddressNotFound(address))?;
        }

        self.payment_methods
            .find_owned(&mut tx, order.payment_method, requester.user)
            .await?
            .ok_or(OrdersServiceError::PaymentMethodNotFound(order.payment_method))?;

        let mut lines = Vec::with_capacity(order.items.len());
        let mut items = Vec::with_capacity(order.items.len());

        for item in &order.items {
            let product = products
                .get(&item.product)
                .ok_or(OrdersServiceError::ProductNotFound(item.product))?;

            let line = PricingLine {
                unit_price: product.unit_price(),
                quantity: item.quantity,
            };

            items.push(OrderItemInsert {
                uuid: OrderItemUuid::new(),
                product: product.uuid,
                product_name: product.name.clone(),
                product_sku: product.sku.clone(),
                product_image: product.image_url.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                subtotal: line_subtotal(line)?,
                options: item.options.clone(),
            });

            lines.push(line);
        }

        let (coupon, evaluated) = match order.coupon_code.as_deref() {
            Some(code) => {
                let coupon = self
                    .coupons
                    .lock_by_code(&mut tx, code)
                    .await?
                    .ok_or_else(|| OrdersServiceError::CouponNotFound(code.to_string()))?;

                let user_usage = self
                    .coupons
                    .count_user_redemptions(&mut tx, &coupon.code, requester.user)
                    .await?;

                let evaluated: EvaluatedCoupon = evaluator::evaluate(
                    &coupon,
                    subtotal(&lines)?,
                    user_usage,
                    Timestamp::now(),
                )?;

                (Some(coupon), Some(evaluated))
            }
            None => (None, None),
        };

        let totals = price_order(&lines, evaluated, &self.pricing)?;

        for (uuid, quantity) in &requested {
            self.ledger.reserve(&mut tx, *uuid, *quantity).await?;
        }

        let mut created = None;

        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let order_number = generate_order_number(Timestamp::now(), &mut rand::thread_rng());

            let insert = OrderInsert {
                uuid: order.uuid,
                order_number: &order_number,
                user: requester.user,
                shipping_address: order.shipping_address,
                billing_address,
                payment_method: order.payment_method,
                totals,
                coupon_code: coupon.as_ref().map(|coupon| coupon.code.as_str()),
                notes: order.notes.as_deref(),
            };

            created = self.orders.insert_order(&mut tx, &insert).await?;

            if created.is_some() {
                break;
            }
        }

        let mut created = created.ok_or(OrdersServiceError::Conflict)?;

        for item in &items {
            let item = self.orders.insert_item(&mut tx, created.uuid, item).await?;

            created.items.push(item);
        }

        if let Some(coupon) = &coupon {
            self.coupons.increment_usage(&mut tx, coupon.uuid).await?;
        }

        tx.commit().await?;

        Span::current()
            .record("order_number", created.order_number.as_str())
            .record("total", created.total);

        info!(
            order_uuid = %created.uuid,
            order_number = %created.order_number,
            total = created.total,
            "created order"
        );

        self.dispatcher
            .order_placed(customer.email, customer.phone, OrderSummary::from(&created));

        Ok(created)
    }

    async fn list_orders(
        &self,
        requester: Requester,
        filter: OrdersFilter,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let filter = scope_filter(requester, filter);

        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_orders(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn count_orders(
        &self,
        requester: Requester,
        filter: OrdersFilter,
    ) -> Result<u64, OrdersServiceError> {
        let filter = scope_filter(requester, filter);

        let mut tx = self.db.begin_transaction().await?;

        let count = self.orders.count_orders(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(count)
    }

    async fn get_order(
        &self,
        requester: Requester,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        visible_to(requester, order)
    }

    async fn get_order_by_number(
        &self,
        requester: Requester,
        order_number: &str,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order_by_number(&mut tx, order_number).await?;

        tx.commit().await?;

        visible_to(requester, order)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, update),
        fields(
            user_uuid = %requester.user,
            order_uuid = %order,
            status = update.status.map(OrderStatus::as_str),
            payment_status = update.payment_status.map(PaymentStatus::as_str)
        ),
        err
    )]
    async fn update_order(
        &self,
        requester: Requester,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !requester.is_admin() {
            return Err(OrdersServiceError::Forbidden);
        }

        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        let payment_status = update.payment_status.unwrap_or(current.payment_status);
        validate_payment_transition(current.payment_status, payment_status)?;

        let status = update.status.unwrap_or(current.status);
        validate_status_transition(current.status, status, payment_status)?;

        let merged = OrderUpdate {
            status: Some(status),
            payment_status: Some(payment_status),
            payment_reference: update.payment_reference.or(current.payment_reference),
            expected_delivery_at: update.expected_delivery_at.or(current.expected_delivery_at),
            notes: update.notes.or(current.notes),
        };

        let updated = self.orders.update_order(&mut tx, order, &merged).await?;

        let customer = self.users.get_user(&mut tx, updated.user_uuid).await?;

        tx.commit().await?;

        if updated.status != current.status {
            info!(
                order_number = %updated.order_number,
                from = %current.status,
                to = %updated.status,
                "order status changed"
            );

            self.dispatcher.status_changed(
                customer.phone,
                updated.order_number.clone(),
                updated.status,
            );
        }

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self),
        fields(user_uuid = %requester.user, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        requester: Requester,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.lock_order(&mut tx, order).await?;

        if !requester.can_access(current.user_uuid) {
            return Err(OrdersServiceError::Forbidden);
        }

        if !current.status.is_cancellable() {
            return Err(TransitionError::NotCancellable(current.status).into());
        }

        let mut released: BTreeMap<ProductUuid, u32> = BTreeMap::new();

        for item in &current.items {
            let quantity = released.entry(item.product_uuid).or_default();
            *quantity = quantity.saturating_add(item.quantity);
        }

        let product_uuids: Vec<ProductUuid> = released.keys().copied().collect();

        self.ledger.lock_products(&mut tx, &product_uuids).await?;

        for (product, quantity) in &released {
            self.ledger.release(&mut tx, *product, *quantity).await?;
        }

        let cancelled = self
            .orders
            .set_status(&mut tx, order, OrderStatus::Cancelled)
            .await?;

        let customer = self.users.get_user(&mut tx, cancelled.user_uuid).await?;

        tx.commit().await?;

        info!(order_number = %cancelled.order_number, "cancelled order");

        self.dispatcher.status_changed(
            customer.phone,
            cancelled.order_number.clone(),
            OrderStatus::Cancelled,
        );

        Ok(cancelled)
    }
}

/// Restrict a listing filter to the requester's own orders unless they are an administrator.
fn scope_filter(requester: Requester, mut filter: OrdersFilter) -> OrdersFilter {
    if !requester.is_admin() {
        filter.user = Some(requester.user);
    }

    filter
}

fn visible_to(
    requester: Requester,
    order: OrderRecord,
) -> Result<OrderRecord, OrdersServiceError> {
    if requester.can_access(order.user_uuid) {
        Ok(order)
    } else {
        Err(OrdersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order for the requester, reserving stock and redeeming the coupon if any.
    async fn create_order(
        &self,
        requester: Requester,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Orders matching `filter`, newest first. Customers only see their own.
    async fn list_orders(
        &self,
        requester: Requester,
        filter: OrdersFilter,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Number of orders matching `filter`, ignoring pagination.
    async fn count_orders(
        &self,
        requester: Requester,
        filter: OrdersFilter,
    ) -> Result<u64, OrdersServiceError>;

    async fn get_order(
        &self,
        requester: Requester,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn get_order_by_number(
        &self,
        requester: Requester,
        order_number: &str,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Administrative patch of status, payment status, payment reference, delivery date
    /// and notes.
    async fn update_order(
        &self,
        requester: Requester,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel a pending or processing order and return its stock.
    async fn cancel_order(
        &self,
        requester: Requester,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
