//! Shipping rates service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use agora::shipping::{FeeSchedule, FeeTier};

use crate::{
    database::Db,
    domain::shipping::{
        data::NewShippingRate,
        errors::ShippingRatesServiceError,
        records::{RateStatus, ShippingRateRecord, ShippingRateUuid},
        repository::PgShippingRatesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgShippingRatesService {
    db: Db,
    repository: PgShippingRatesRepository,
    default_fee: u64,
}

impl PgShippingRatesService {
    #[must_use]
    pub fn new(db: Db, default_fee: u64) -> Self {
        Self {
            db,
            repository: PgShippingRatesRepository::new(),
            default_fee,
        }
    }
}

#[async_trait]
impl ShippingRatesService for PgShippingRatesService {
    async fn list_rates(&self) -> Result<Vec<ShippingRateRecord>, ShippingRatesServiceError> {
        let mut tx = self.db.begin().await?;

        let rates = self.repository.list_rates(&mut tx).await?;

        tx.commit().await?;

        Ok(rates)
    }

    async fn create_rate(
        &self,
        rate: NewShippingRate,
    ) -> Result<ShippingRateRecord, ShippingRatesServiceError> {
        let candidate =
            FeeTier::over_kilometres(rate.from_km, rate.to_km, rate.base_fee, rate.per_km_fee)?;

        let mut tx = self.db.begin().await?;

        if rate.status == RateStatus::Active {
            let active = self.repository.list_active_rates(&mut tx).await?;
            let mut tiers = tiers_of(&active)?;
            tiers.push(candidate);

            // Validation only; quoting rebuilds the schedule from storage.
            FeeSchedule::new(tiers, self.default_fee)?;
        }

        let created = self.repository.create_rate(&mut tx, &rate).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_rate(&self, rate: ShippingRateUuid) -> Result<(), ShippingRatesServiceError> {
        let mut tx = self.db.begin().await?;

        if self.repository.delete_rate(&mut tx, rate).await? == 0 {
            return Err(ShippingRatesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn active_schedule(&self) -> Result<FeeSchedule, ShippingRatesServiceError> {
        let mut tx = self.db.begin().await?;

        let schedule = load_active_schedule(&self.repository, &mut tx, self.default_fee).await?;

        tx.commit().await?;

        Ok(schedule)
    }
}

/// Build the quoting schedule from the active rates, inside an existing
/// transaction. Checkout and order placement load their schedule through
/// this so fee quotes see the same rates as the rest of their work.
pub(crate) async fn load_active_schedule(
    repository: &PgShippingRatesRepository,
    tx: &mut Transaction<'_, Postgres>,
    default_fee: u64,
) -> Result<FeeSchedule, ShippingRatesServiceError> {
    let rates = repository.list_active_rates(tx).await?;

    Ok(FeeSchedule::new(tiers_of(&rates)?, default_fee)?)
}

fn tiers_of(rates: &[ShippingRateRecord]) -> Result<Vec<FeeTier>, ShippingRatesServiceError> {
    rates
        .iter()
        .map(|rate| rate.to_tier().map_err(Into::into))
        .collect()
}

#[automock]
#[async_trait]
pub trait ShippingRatesService: Send + Sync {
    /// Every stored rate, active or not, ordered by bracket start.
    async fn list_rates(&self) -> Result<Vec<ShippingRateRecord>, ShippingRatesServiceError>;

    /// Store a rate. An active rate must not overlap another active
    /// bracket; inactive rates are parked without the overlap check.
    async fn create_rate(
        &self,
        rate: NewShippingRate,
    ) -> Result<ShippingRateRecord, ShippingRatesServiceError>;

    async fn delete_rate(&self, rate: ShippingRateUuid) -> Result<(), ShippingRatesServiceError>;

    /// The quoting schedule built from the active rates plus the
    /// configured fallback fee.
    async fn active_schedule(&self) -> Result<FeeSchedule, ShippingRatesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use agora::shipping::ScheduleError;

    use crate::test::TestContext;

    use super::*;

    fn bracket(from_km: u32, to_km: u32) -> NewShippingRate {
        NewShippingRate {
            uuid: ShippingRateUuid::new(),
            from_km,
            to_km,
            base_fee: 50_000,
            per_km_fee: 2_000,
            status: RateStatus::Active,
        }
    }

    #[tokio::test]
    async fn create_rate_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let rate = ctx.shipping_rates.create_rate(bracket(0, 10)).await?;

        assert_eq!(rate.from_km, 0);
        assert_eq!(rate.to_km, 10);
        assert_eq!(rate.base_fee, 50_000);
        assert_eq!(rate.per_km_fee, 2_000);
        assert_eq!(rate.status, RateStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_bounds_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping_rates
            .create_rate(NewShippingRate {
                status: RateStatus::Inactive,
                ..bracket(0, 10)
            })
            .await?;

        // Same bounds again, also inactive so the overlap check stays out
        // of the way and the unique constraint does the talking.
        let result = ctx
            .shipping_rates
            .create_rate(NewShippingRate {
                status: RateStatus::Inactive,
                ..bracket(0, 10)
            })
            .await;

        assert!(
            matches!(result, Err(ShippingRatesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn overlapping_active_rates_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping_rates.create_rate(bracket(0, 10)).await?;

        let result = ctx.shipping_rates.create_rate(bracket(8, 20)).await;

        assert!(
            matches!(
                result,
                Err(ShippingRatesServiceError::InvalidTier(
                    ScheduleError::Overlap { .. }
                ))
            ),
            "expected Overlap, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn inactive_rate_may_overlap_an_active_one() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping_rates.create_rate(bracket(0, 10)).await?;

        let parked = ctx
            .shipping_rates
            .create_rate(NewShippingRate {
                status: RateStatus::Inactive,
                ..bracket(5, 15)
            })
            .await?;

        assert_eq!(parked.status, RateStatus::Inactive);

        Ok(())
    }

    #[tokio::test]
    async fn inverted_bounds_are_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.shipping_rates.create_rate(bracket(10, 5)).await;

        assert!(
            matches!(
                result,
                Err(ShippingRatesServiceError::InvalidTier(
                    ScheduleError::InvertedBounds { .. }
                ))
            ),
            "expected InvertedBounds, got {result:?}"
        );
    }

    #[tokio::test]
    async fn delete_rate_removes_the_rate() -> TestResult {
        let ctx = TestContext::new().await;

        let rate = ctx.shipping_rates.create_rate(bracket(0, 10)).await?;

        ctx.shipping_rates.delete_rate(rate.uuid).await?;

        let rates = ctx.shipping_rates.list_rates().await?;

        assert!(rates.is_empty(), "expected no rates, got {rates:?}");

        Ok(())
    }

    #[tokio::test]
    async fn deleting_an_unknown_rate_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.shipping_rates.delete_rate(ShippingRateUuid::new()).await;

        assert!(
            matches!(result, Err(ShippingRatesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn active_schedule_quotes_through_stored_tiers() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping_rates.create_rate(bracket(0, 10)).await?;

        let schedule = ctx.shipping_rates.active_schedule().await?;

        // 5km into the bracket: 50 000 + 5 × 2 000 = 60 000.
        assert_eq!(schedule.quote(5_000).fee(), 60_000);

        Ok(())
    }

    #[tokio::test]
    async fn active_schedule_ignores_inactive_rates() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.shipping_rates
            .create_rate(NewShippingRate {
                status: RateStatus::Inactive,
                ..bracket(0, 10)
            })
            .await?;

        let schedule = ctx.shipping_rates.active_schedule().await?;

        // The only bracket is parked, so quoting falls back to the
        // context's default fee.
        assert_eq!(schedule.quote(5_000).fee(), TestContext::DEFAULT_SHIPPING_FEE);

        Ok(())
    }
}
