//! Order Cancellation Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, update_status::StatusTrailResponse},
    state::State,
};

/// Order Cancellation Handler
///
/// Cancels the signed-in account's own order. Only possible while the
/// order is still being received; after that the shop has to do it.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<StatusTrailResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let history = state
        .app
        .orders
        .cancel_order(account.uuid, uuid.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(history.into()))
}
