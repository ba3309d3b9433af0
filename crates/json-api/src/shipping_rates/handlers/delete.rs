//! Shipping Rate Deletion Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    errors::ApiError, extensions::*, shipping_rates::errors::into_api_error, state::State,
};

/// Shipping Rate Deletion Handler
///
/// Removes a rate outright. Quoting falls back to the default fee for
/// distances the remaining brackets no longer cover.
#[endpoint(
    tags("shipping-rates"),
    summary = "Delete Shipping Rate",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .shipping_rates
        .delete_rate(uuid.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use agora_app::domain::shipping::{
        MockShippingRatesService, ShippingRatesServiceError, records::ShippingRateUuid,
    };

    use crate::test_helpers::{TestApp, admin_service};

    use super::*;

    fn make_service(shipping_rates: MockShippingRatesService) -> Service {
        let app = TestApp {
            shipping_rates,
            ..TestApp::default()
        };

        admin_service(app, Router::with_path("shipping-rates/{uuid}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_removes_the_rate() -> TestResult {
        let rate_uuid = ShippingRateUuid::new();

        let mut shipping_rates = MockShippingRatesService::new();

        shipping_rates
            .expect_delete_rate()
            .once()
            .withf(move |rate| *rate == rate_uuid)
            .return_once(|_| Ok(()));

        shipping_rates.expect_list_rates().never();
        shipping_rates.expect_create_rate().never();
        shipping_rates.expect_active_schedule().never();

        let url = format!("http://example.com/shipping-rates/{rate_uuid}");

        let res = TestClient::delete(url).send(&make_service(shipping_rates)).await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_rate_returns_404() -> TestResult {
        let mut shipping_rates = MockShippingRatesService::new();

        shipping_rates
            .expect_delete_rate()
            .once()
            .return_once(|_| Err(ShippingRatesServiceError::NotFound));

        shipping_rates.expect_list_rates().never();
        shipping_rates.expect_create_rate().never();
        shipping_rates.expect_active_schedule().never();

        let url = format!("http://example.com/shipping-rates/{}", ShippingRateUuid::new());

        let res = TestClient::delete(url).send(&make_service(shipping_rates)).await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
