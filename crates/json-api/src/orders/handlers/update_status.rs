//! Order Status Update Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora::status::{OrderStatus, StatusEntry};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, get::StatusEntryResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// The target status label, e.g. `Order processing`
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusTrailResponse {
    /// The order's status trail after the change, oldest first
    pub history: Vec<StatusEntryResponse>,
}

impl From<Vec<StatusEntry>> for StatusTrailResponse {
    fn from(entries: Vec<StatusEntry>) -> Self {
        StatusTrailResponse {
            history: entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order Status Update Handler
///
/// Moves an order to the requested status. Delivery stages advance one
/// step at a time; picking an earlier stage rewinds the trail.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    request: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<StatusTrailResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let target: OrderStatus = request
        .into_inner()
        .status
        .parse()
        .map_err(|_unknown| ApiError::bad_request().brief("Unknown order status"))?;

    let history = state
        .app
        .orders
        .update_status(uuid.into_inner().into(), target)
        .await
        .map_err(into_api_error)?;

    Ok(Json(history.into()))
}
