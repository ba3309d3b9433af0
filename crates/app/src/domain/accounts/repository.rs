//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::accounts::records::{
    AccountRecord, AccountRole, AccountUuid, AddressRecord, AddressUuid,
};

const CREATE_ACCOUNT_SQL: &str = include_str!("sql/create_account.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const GET_DEFAULT_ADDRESS_SQL: &str = include_str!("sql/get_default_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        name: &str,
        email: &str,
        phone: &str,
        role: AccountRole,
    ) -> Result<AccountRecord, sqlx::Error> {
        query_as::<Postgres, AccountRecord>(CREATE_ACCOUNT_SQL)
            .bind(account.into_uuid())
            .bind(name)
            .bind(email)
            .bind(phone)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        account: AccountUuid,
        recipient: &str,
        phone: &str,
        line: &str,
        is_default: bool,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(CREATE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(account.into_uuid())
            .bind(recipient)
            .bind(phone)
            .bind(line)
            .bind(is_default)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an address, scoped to the owning account.
    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
        address: AddressUuid,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(account.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// The account's default address, if it has marked one.
    pub(crate) async fn get_default_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        account: AccountUuid,
    ) -> Result<Option<AddressRecord>, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_DEFAULT_ADDRESS_SQL)
            .bind(account.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

pub(crate) fn try_get_role(row: &PgRow, index: &str) -> sqlx::Result<AccountRole> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for AccountRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AccountUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            role: try_get_role(row, "role")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            recipient: row.try_get("recipient")?,
            phone: row.try_get("phone")?,
            line: row.try_get("line")?,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
