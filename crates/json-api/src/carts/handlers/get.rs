//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::domain::carts::records::{CartSnapshot, SnapshotLine};

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// One priced cart line, display fields included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub product_uuid: Uuid,
    pub title: String,
    pub image_url: Option<String>,

    /// Listed unit price before the discount
    pub unit_price: u64,

    pub discount_percent: u8,

    /// Unit price once the discount is applied
    pub final_unit_price: u64,

    pub quantity: u32,

    /// `final_unit_price` times `quantity`
    pub line_total: u64,
}

impl From<SnapshotLine> for CartLineResponse {
    fn from(line: SnapshotLine) -> Self {
        CartLineResponse {
            product_uuid: line.product_uuid.into(),
            title: line.title,
            image_url: line.image_url,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent,
            final_unit_price: line.final_unit_price,
            quantity: line.quantity,
            line_total: line.line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub cart_uuid: Uuid,

    pub items: Vec<CartLineResponse>,

    /// Products dropped from the snapshot because they are no longer sold
    pub skipped: Vec<Uuid>,

    /// Sum of line totals, shipping excluded
    pub subtotal: u64,
}

impl From<CartSnapshot> for CartResponse {
    fn from(snapshot: CartSnapshot) -> Self {
        CartResponse {
            cart_uuid: snapshot.cart_uuid.into(),
            items: snapshot.lines.into_iter().map(Into::into).collect(),
            skipped: snapshot.skipped.into_iter().map(Into::into).collect(),
            subtotal: snapshot.subtotal,
        }
    }
}

/// Get Cart Handler
///
/// Returns the signed-in account's active cart, priced line by line.
#[endpoint(tags("cart"), summary = "Get Cart", security(("session_cookie" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let snapshot = state
        .app
        .carts
        .snapshot(account.uuid)
        .await
        .map_err(into_api_error)?;

    Ok(Json(snapshot.into()))
}
