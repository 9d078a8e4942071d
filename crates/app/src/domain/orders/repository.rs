//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    addresses::records::AddressUuid,
    amounts::{
        try_get_amount, try_get_quantity, try_i32_from_u32, try_i64_from_u64,
        try_optional_i64_from_u64,
    },
    orders::{
        data::{OrderUpdate, OrdersFilter},
        records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        status::{OrderStatus, PaymentStatus},
    },
    payment_methods::records::PaymentMethodUuid,
    pricing::PriceBreakdown,
    products::records::ProductUuid,
    users::records::UserUuid,
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("sql/get_order_by_number.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("sql/set_order_status.sql");

/// Order row as written at checkout.
#[derive(Debug, Clone)]
pub(crate) struct OrderInsert<'a> {
    pub uuid: OrderUuid,
    pub order_number: &'a str,
    pub user: UserUuid,
    pub shipping_address: AddressUuid,
    pub billing_address: AddressUuid,
    pub payment_method: PaymentMethodUuid,
    pub totals: PriceBreakdown,
    pub coupon_code: Option<&'a str>,
    pub notes: Option<&'a str>,
}

/// Product snapshot written for one order line.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemInsert {
    pub uuid: OrderItemUuid,
    pub product: ProductUuid,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub product_image: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub subtotal: u64,
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order, returning `None` when its order number is already taken.
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderInsert<'_>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number)
            .bind(order.user.into_uuid())
            .bind(order.shipping_address.into_uuid())
            .bind(order.billing_address.into_uuid())
            .bind(order.payment_method.into_uuid())
            .bind(try_i64_from_u64(order.totals.subtotal, "subtotal")?)
            .bind(try_i64_from_u64(order.totals.tax, "tax")?)
            .bind(try_i64_from_u64(order.totals.shipping_cost, "shipping_cost")?)
            .bind(try_i64_from_u64(order.totals.discount, "discount")?)
            .bind(try_i64_from_u64(order.totals.total, "total")?)
            .bind(order.coupon_code)
            .bind(order.notes)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn insert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: &OrderItemInsert,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(INSERT_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(item.product.into_uuid())
            .bind(&item.product_name)
            .bind(item.product_sku.as_deref())
            .bind(&item.product_image)
            .bind(try_i64_from_u64(item.unit_price, "unit_price")?)
            .bind(try_i32_from_u32(item.quantity, "quantity")?)
            .bind(try_i64_from_u64(item.subtotal, "subtotal")?)
            .bind(item.options.as_ref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    pub(crate) async fn get_order_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_BY_NUMBER_SQL)
            .bind(order_number)
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    /// Fetch an order with its items and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrdersFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.user.map(|user| user.into_uuid()))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.payment_status.map(PaymentStatus::as_str))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .bind(try_optional_i64_from_u64(filter.min_total, "min_total")?)
            .bind(try_optional_i64_from_u64(filter.max_total, "max_total")?)
            .bind(try_i64_from_u64(filter.offset, "offset")?)
            .bind(i64::from(filter.effective_limit()))
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, &mut orders).await?;

        Ok(orders)
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrdersFilter,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(filter.user.map(|user| user.into_uuid()))
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.payment_status.map(PaymentStatus::as_str))
            .bind(filter.created_from.map(SqlxTimestamp::from))
            .bind(filter.created_to.map(SqlxTimestamp::from))
            .bind(try_optional_i64_from_u64(filter.min_total, "min_total")?)
            .bind(try_optional_i64_from_u64(filter.max_total, "max_total")?)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    /// Write the administrative fields of an order. `update` must already be merged with
    /// the current values.
    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &OrderUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(update.status.map(OrderStatus::as_str))
            .bind(update.payment_status.map(PaymentStatus::as_str))
            .bind(update.payment_reference.as_deref())
            .bind(update.expected_delivery_at.map(SqlxTimestamp::from))
            .bind(update.notes.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, std::slice::from_mut(&mut order)).await?;

        Ok(order)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let items = query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }
}

fn decode_column<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            shipping_address_uuid: AddressUuid::from_uuid(row.try_get("shipping_address_uuid")?),
            billing_address_uuid: AddressUuid::from_uuid(row.try_get("billing_address_uuid")?),
            payment_method_uuid: PaymentMethodUuid::from_uuid(
                row.try_get("payment_method_uuid")?,
            ),
            status: decode_column(row, "status")?,
            payment_status: decode_column(row, "payment_status")?,
            subtotal: try_get_amount(row, "subtotal")?,
            tax: try_get_amount(row, "tax")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            discount: try_get_amount(row, "discount")?,
            total: try_get_amount(row, "total")?,
            coupon_code: row.try_get("coupon_code")?,
            notes: row.try_get("notes")?,
            payment_reference: row.try_get("payment_reference")?,
            expected_delivery_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expected_delivery_at")?
                .map(SqlxTimestamp::to_jiff),
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            product_sku: row.try_get("product_sku")?,
            product_image: row.try_get("product_image")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_quantity(row, "quantity")?,
            subtotal: try_get_amount(row, "subtotal")?,
            options: row.try_get("options")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
