//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    orders::records::OrderUuid,
    payments::{
        data::NewPayment,
        records::{PaymentMethod, PaymentRecord, PaymentStatus, PaymentUuid},
    },
    products::{amount_param, try_get_amount},
};

const INSERT_PAYMENT_SQL: &str = include_str!("sql/insert_payment.sql");
const GET_PAYMENT_FOR_ORDER_SQL: &str = include_str!("sql/get_payment_for_order.sql");
const UPDATE_PAYMENT_SQL: &str = include_str!("sql/update_payment.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewPayment,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(INSERT_PAYMENT_SQL)
            .bind(payment.uuid.into_uuid())
            .bind(payment.order_uuid.into_uuid())
            .bind(payment.method.as_str())
            .bind(amount_param(payment.amount, "amount")?)
            .bind(payment.request_id.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch an order's payment and lock it for the rest of the
    /// transaction, so concurrent callback deliveries serialise.
    pub(crate) async fn get_payment_for_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_FOR_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        status: PaymentStatus,
        transaction_id: Option<&str>,
        gateway_response: &serde_json::Value,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(UPDATE_PAYMENT_SQL)
            .bind(payment.into_uuid())
            .bind(status.as_str())
            .bind(transaction_id)
            .bind(gateway_response)
            .fetch_one(&mut **tx)
            .await
    }
}

pub(crate) fn try_get_payment_method(row: &PgRow, index: &str) -> sqlx::Result<PaymentMethod> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_get_payment_status(row: &PgRow, index: &str) -> sqlx::Result<PaymentStatus> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            method: try_get_payment_method(row, "method")?,
            amount: try_get_amount(row, "amount")?,
            request_id: row.try_get("request_id")?,
            transaction_id: row.try_get("transaction_id")?,
            status: try_get_payment_status(row, "status")?,
            gateway_response: row.try_get("gateway_response")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
