//! Shipping Rate Creation Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use agora_app::domain::shipping::{
    data::NewShippingRate,
    records::{RateStatus, ShippingRateUuid},
};

use crate::{
    errors::ApiError,
    extensions::*,
    shipping_rates::{errors::into_api_error, index::ShippingRateResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateRateRequest {
    /// Bracket start, inclusive kilometres
    pub from_km: u32,

    /// Bracket end, inclusive kilometres
    pub to_km: u32,

    /// Flat fee for the bracket, in VND
    pub base_fee: u64,

    /// Added per started kilometre past the bracket start, in VND
    pub per_km_fee: u64,

    /// `active` or `inactive`; omitted rates go live straight away
    pub status: Option<String>,
}

/// Shipping Rate Creation Handler
///
/// Stores a fee bracket. Active brackets must not overlap an existing
/// active one.
#[endpoint(
    tags("shipping-rates"),
    summary = "Create Shipping Rate",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    request: JsonBody<CreateRateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ShippingRateResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = request.into_inner();

    let status: RateStatus = match request.status {
        Some(status) => status.parse().map_err(|_unknown| {
            ApiError::bad_request().brief("Status must be active or inactive")
        })?,
        None => RateStatus::Active,
    };

    let rate = NewShippingRate {
        uuid: ShippingRateUuid::new(),
        from_km: request.from_km,
        to_km: request.to_km,
        base_fee: request.base_fee,
        per_km_fee: request.per_km_fee,
        status,
    };

    let created = state
        .app
        .shipping_rates
        .create_rate(rate)
        .await
        .map_err(into_api_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}
