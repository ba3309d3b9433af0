//! Update Cart Item Handler

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

use crate::{
    carts::{add_item::CartItemResponse, errors::into_api_error},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateItemRequest {
    /// The new line quantity, replacing the old one outright
    pub quantity: u32,
}

/// Update Cart Item Handler
///
/// Replaces the quantity of one cart line.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity replaced"),
        (status_code = StatusCode::NOT_FOUND, description = "No such cart line"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product_uuid: PathParam<Uuid>,
    json: JsonBody<UpdateItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let item = state
        .app
        .carts
        .set_item_quantity(
            account.uuid,
            product_uuid.into_inner().into(),
            json.into_inner().quantity,
        )
        .await
        .map_err(into_api_error)?;

    Ok(Json(item.into()))
}
