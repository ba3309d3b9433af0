//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    carts::records::{CartItemRecord, CartItemUuid, CartLineRecord, CartUuid},
    products::{
        quantity_param, records::ProductUuid, try_get_amount, try_get_percent, try_get_quantity,
    },
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const SET_CART_ITEM_QUANTITY_SQL: &str = include_str!("../sql/set_cart_item_quantity.sql");
const REMOVE_CART_ITEM_SQL: &str = include_str!("../sql/remove_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Cart lines joined with their products, discontinued ones included
    /// so the snapshot builder can report them as skipped.
    pub(crate) async fn get_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a line, or add the quantity onto the line the cart already
    /// has for this product.
    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: CartItemUuid,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItemRecord, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(UPSERT_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity_param(quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(SET_CART_ITEM_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity_param(quantity, "quantity")?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn remove_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item_uuid: CartItemUuid::from_uuid(row.try_get("item_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            title: row.try_get("title")?,
            image_url: row.try_get("image_url")?,
            price: try_get_amount(row, "price")?,
            discount_percent: try_get_percent(row, "discount_percent")?,
            stock: try_get_quantity(row, "stock")?,
            quantity: try_get_quantity(row, "quantity")?,
            discontinued: row.try_get("discontinued")?,
        })
    }
}
