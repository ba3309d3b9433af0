//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use agora::status::OrderStatus;

use crate::{
    domain::{
        accounts::records::AccountUuid,
        carts::records::CartUuid,
        orders::{
            data::NewOrder,
            records::{OrderLineRecord, OrderRecord, OrderStatusRecord, OrderUuid},
        },
        payments::{records::PaymentStatus, try_get_payment_method, try_get_payment_status},
        products::{
            amount_param, quantity_param, records::ProductUuid, try_get_amount, try_get_percent,
            try_get_quantity,
        },
    },
    pagination::PageRequest,
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEM_SQL: &str = include_str!("sql/insert_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_FOR_UPDATE_SQL: &str = include_str!("sql/get_order_for_update.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");
const GET_STATUS_HISTORY_SQL: &str = include_str!("sql/get_status_history.sql");
const INSERT_STATUS_ENTRY_SQL: &str = include_str!("sql/insert_status_entry.sql");
const DELETE_STATUS_FROM_SQL: &str = include_str!("sql/delete_status_from.sql");
const TOUCH_STATUS_ENTRY_SQL: &str = include_str!("sql/touch_status_entry.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const SET_PAYMENT_STATUS_SQL: &str = include_str!("sql/set_payment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.account_uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(&order.recipient)
            .bind(&order.email)
            .bind(&order.phone)
            .bind(&order.address_line)
            .bind(order.payment_method.as_str())
            .bind(amount_param(order.subtotal, "subtotal")?)
            .bind(amount_param(order.shipping_fee, "shipping_fee")?)
            .bind(amount_param(order.total, "total")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn insert_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        product: ProductUuid,
        unit_price: u64,
        discount_percent: u8,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ORDER_ITEM_SQL)
            .bind(order.into_uuid())
            .bind(product.into_uuid())
            .bind(amount_param(unit_price, "unit_price")?)
            .bind(i16::from(discount_percent))
            .bind(quantity_param(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order and lock its row for the rest of the transaction.
    /// Status changes go through here so concurrent updates queue up
    /// instead of interleaving on the history table.
    pub(crate) async fn get_order_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderLineRecord>, sqlx::Error> {
        query_as::<Postgres, OrderLineRecord>(GET_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_status_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderStatusRecord>, sqlx::Error> {
        query_as::<Postgres, OrderStatusRecord>(GET_STATUS_HISTORY_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn insert_status_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        status: OrderStatus,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_STATUS_ENTRY_SQL)
            .bind(order.into_uuid())
            .bind(position_param(position, "position")?)
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Drop every history row at or above `position`.
    pub(crate) async fn delete_status_from(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_STATUS_FROM_SQL)
            .bind(order.into_uuid())
            .bind(position_param(position, "position")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn touch_status_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: usize,
        at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_STATUS_ENTRY_SQL)
            .bind(order.into_uuid())
            .bind(position_param(position, "position")?)
            .bind(SqlxTimestamp::from(at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(account.into_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn set_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: PaymentStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Convert a 0-based history position into an `INTEGER` bind parameter.
fn position_param(value: usize, index: &str) -> sqlx::Result<i32> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

fn try_get_order_status(row: &PgRow, index: &str) -> sqlx::Result<OrderStatus> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            recipient: row.try_get("recipient")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address_line: row.try_get("address_line")?,
            payment_method: try_get_payment_method(row, "payment_method")?,
            payment_status: try_get_payment_status(row, "payment_status")?,
            subtotal: try_get_amount(row, "subtotal")?,
            shipping_fee: try_get_amount(row, "shipping_fee")?,
            total: try_get_amount(row, "total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
            quantity: try_get_quantity(row, "quantity")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderStatusRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            position: try_get_quantity(row, "position")?,
            status: try_get_order_status(row, "status")?,
            recorded_at: row.try_get::<SqlxTimestamp, _>("recorded_at")?.to_jiff(),
        })
    }
}
