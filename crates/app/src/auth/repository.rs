//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    auth::records::{CurrentAccount, SessionRecord},
    domain::accounts::{records::AccountUuid, try_get_role},
};

const FIND_SESSION_ACCOUNT_SQL: &str = include_str!("sql/find_session_account.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");

#[derive(Debug, Clone, Default)]
pub struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Resolve a session token to its account, ignoring expired sessions.
    pub(crate) async fn find_session_account(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &str,
    ) -> Result<Option<CurrentAccount>, sqlx::Error> {
        query_as::<Postgres, CurrentAccount>(FIND_SESSION_ACCOUNT_SQL)
            .bind(token)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &str,
        account: AccountUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<SessionRecord, sqlx::Error> {
        query_as::<Postgres, SessionRecord>(CREATE_SESSION_SQL)
            .bind(token)
            .bind(account.into_uuid())
            .bind(expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CurrentAccount {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AccountUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            role: try_get_role(row, "role")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SessionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            token: row.try_get("token")?,
            account_uuid: AccountUuid::from_uuid(row.try_get("account_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
