//! Shipping Rates Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    products::{amount_param, quantity_param, try_get_amount, try_get_quantity},
    shipping::{
        data::NewShippingRate,
        records::{RateStatus, ShippingRateRecord, ShippingRateUuid},
    },
};

const LIST_RATES_SQL: &str = include_str!("sql/list_rates.sql");
const LIST_ACTIVE_RATES_SQL: &str = include_str!("sql/list_active_rates.sql");
const CREATE_RATE_SQL: &str = include_str!("sql/create_rate.sql");
const DELETE_RATE_SQL: &str = include_str!("sql/delete_rate.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgShippingRatesRepository;

impl PgShippingRatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ShippingRateRecord>, sqlx::Error> {
        query_as::<Postgres, ShippingRateRecord>(LIST_RATES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_rates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ShippingRateRecord>, sqlx::Error> {
        query_as::<Postgres, ShippingRateRecord>(LIST_ACTIVE_RATES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rate: &NewShippingRate,
    ) -> Result<ShippingRateRecord, sqlx::Error> {
        query_as::<Postgres, ShippingRateRecord>(CREATE_RATE_SQL)
            .bind(rate.uuid.into_uuid())
            .bind(quantity_param(rate.from_km, "from_km")?)
            .bind(quantity_param(rate.to_km, "to_km")?)
            .bind(amount_param(rate.base_fee, "base_fee")?)
            .bind(amount_param(rate.per_km_fee, "per_km_fee")?)
            .bind(rate.status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_rate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rate: ShippingRateUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_RATE_SQL)
            .bind(rate.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ShippingRateRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ShippingRateUuid::from_uuid(row.try_get("uuid")?),
            from_km: try_get_quantity(row, "from_km")?,
            to_km: try_get_quantity(row, "to_km")?,
            base_fee: try_get_amount(row, "base_fee")?,
            per_km_fee: try_get_amount(row, "per_km_fee")?,
            status: try_get_rate_status(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

fn try_get_rate_status(row: &PgRow, index: &str) -> sqlx::Result<RateStatus> {
    let raw: String = row.try_get(index)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}
