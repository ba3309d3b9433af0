//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::domain::carts::{data::NewCartItem, records::CartItemRecord};

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

impl From<AddItemRequest> for NewCartItem {
    fn from(request: AddItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub uuid: Uuid,
    pub cart_uuid: Uuid,
    pub product_uuid: Uuid,

    /// Line quantity after any merge with an existing line
    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        CartItemResponse {
            uuid: item.uuid.into(),
            cart_uuid: item.cart_uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
        }
    }
}

/// Add Cart Item Handler
///
/// Puts a product in the cart, creating the cart on first use. Adding a
/// product already in the cart adds to its quantity instead of creating
/// a second line.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let item = state
        .app
        .carts
        .add_item(account.uuid, json.into_inner().into())
        .await
        .map_err(into_api_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
