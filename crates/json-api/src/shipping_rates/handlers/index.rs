//! Shipping Rate Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::domain::shipping::records::ShippingRateRecord;

use crate::{errors::ApiError, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingRatesResponse {
    /// Every stored rate, ordered by bracket start
    pub rates: Vec<ShippingRateResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingRateResponse {
    /// The rate's UUID
    pub uuid: Uuid,

    /// Bracket start, inclusive kilometres
    pub from_km: u32,

    /// Bracket end, inclusive kilometres
    pub to_km: u32,

    /// Flat fee for the bracket, in VND
    pub base_fee: u64,

    /// Added per started kilometre past the bracket start, in VND
    pub per_km_fee: u64,

    /// `active` or `inactive`
    pub status: String,

    /// When the rate was created
    pub created_at: String,

    /// When the rate last changed
    pub updated_at: String,
}

impl From<ShippingRateRecord> for ShippingRateResponse {
    fn from(rate: ShippingRateRecord) -> Self {
        ShippingRateResponse {
            uuid: rate.uuid.into(),
            from_km: rate.from_km,
            to_km: rate.to_km,
            base_fee: rate.base_fee,
            per_km_fee: rate.per_km_fee,
            status: rate.status.to_string(),
            created_at: rate.created_at.to_string(),
            updated_at: rate.updated_at.to_string(),
        }
    }
}

/// Shipping Rate Index Handler
///
/// Returns every stored rate, active or not.
#[endpoint(
    tags("shipping-rates"),
    summary = "List Shipping Rates",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ShippingRatesResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let rates = state
        .app
        .shipping_rates
        .list_rates()
        .await
        .or_500("failed to fetch shipping rates")?;

    Ok(Json(ShippingRatesResponse {
        rates: rates.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use agora_app::domain::shipping::{
        MockShippingRatesService,
        records::{RateStatus, ShippingRateUuid},
    };

    use crate::{
        auth::middleware::require_admin,
        test_helpers::{TestApp, admin_service, authed_service},
    };

    use super::*;

    fn make_rate(uuid: ShippingRateUuid, from_km: u32, to_km: u32) -> ShippingRateRecord {
        ShippingRateRecord {
            uuid,
            from_km,
            to_km,
            base_fee: 15_000,
            per_km_fee: 2_000,
            status: RateStatus::Active,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn rates_route() -> Router {
        Router::with_path("shipping-rates")
            .hoop(require_admin)
            .get(handler)
    }

    fn make_service(shipping_rates: MockShippingRatesService) -> Service {
        let app = TestApp {
            shipping_rates,
            ..TestApp::default()
        };

        admin_service(app, rates_route())
    }

    #[tokio::test]
    async fn test_index_returns_the_stored_rates() -> TestResult {
        let uuid_a = ShippingRateUuid::new();
        let uuid_b = ShippingRateUuid::new();

        let mut shipping_rates = MockShippingRatesService::new();

        shipping_rates
            .expect_list_rates()
            .once()
            .return_once(move || Ok(vec![make_rate(uuid_a, 0, 5), make_rate(uuid_b, 6, 20)]));

        shipping_rates.expect_create_rate().never();
        shipping_rates.expect_delete_rate().never();
        shipping_rates.expect_active_schedule().never();

        let response: ShippingRatesResponse =
            TestClient::get("http://example.com/shipping-rates")
                .send(&make_service(shipping_rates))
                .await
                .take_json()
                .await?;

        assert_eq!(response.rates.len(), 2, "expected two rates");
        assert_eq!(response.rates[0].uuid, uuid_a.into_uuid());
        assert_eq!(response.rates[0].status, "active");
        assert_eq!(response.rates[1].from_km, 6);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_as_customer_returns_403() -> TestResult {
        let mut shipping_rates = MockShippingRatesService::new();

        shipping_rates.expect_list_rates().never();
        shipping_rates.expect_create_rate().never();
        shipping_rates.expect_delete_rate().never();
        shipping_rates.expect_active_schedule().never();

        let app = TestApp {
            shipping_rates,
            ..TestApp::default()
        };

        let res = TestClient::get("http://example.com/shipping-rates")
            .send(&authed_service(app, rates_route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
