//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Remove Cart Item Handler
///
/// Drops one line from the cart. The rest of the cart is untouched.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Line removed"),
        (status_code = StatusCode::NOT_FOUND, description = "No such cart line"),
    ),
)]
pub(crate) async fn handler(
    product_uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    state
        .app
        .carts
        .remove_item(account.uuid, product_uuid.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
