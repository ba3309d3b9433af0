//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    accounts::records::AccountUuid,
    carts::records::{CartRecord, CartStatus, CartUuid},
};

const GET_ACTIVE_CART_SQL: &str = include_str!("../sql/get_active_cart.sql");
const GET_OR_CREATE_CART_SQL: &str = include_str!("../sql/get_or_create_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_active_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_ACTIVE_CART_SQL)
            .bind(account.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the account's active cart, creating one with the given uuid
    /// if none exists yet. The uuid is discarded when a cart is already
    /// there.
    pub(crate) async fn get_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        account: AccountUuid,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_OR_CREATE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            status: try_get_cart_status(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

fn try_get_cart_status(row: &PgRow, index: &str) -> sqlx::Result<CartStatus> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}
