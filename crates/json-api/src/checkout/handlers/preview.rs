//! Checkout Preview Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::domain::{accounts::records::AddressRecord, checkout::records::CheckoutPreview};

use crate::{
    carts::get::CartLineResponse, checkout::errors::into_api_error, errors::ApiError,
    extensions::*, state::State,
};

/// The delivery address a quote was made against.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub recipient: String,
    pub phone: String,

    /// Full postal address as one line
    pub line: String,

    pub is_default: bool,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        AddressResponse {
            uuid: address.uuid.into(),
            recipient: address.recipient,
            phone: address.phone,
            line: address.line,
            is_default: address.is_default,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PreviewData {
    pub cart_uuid: Uuid,

    pub items: Vec<CartLineResponse>,

    /// Products dropped because they are no longer sold
    pub skipped: Vec<Uuid>,

    /// Sum of line totals
    pub subtotal: u64,

    /// Delivery fee for the selected address, already rounded to whole
    /// thousands of đồng
    pub shipping_fee: u64,

    /// `subtotal + shipping_fee`
    pub total_price: u64,

    pub selected_address: AddressResponse,
}

/// Checkout Preview Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PreviewResponse {
    /// Always `"success"`
    pub status: String,
    pub data: PreviewData,
}

impl From<CheckoutPreview> for PreviewResponse {
    fn from(preview: CheckoutPreview) -> Self {
        PreviewResponse {
            status: "success".to_owned(),
            data: PreviewData {
                cart_uuid: preview.cart_uuid.into(),
                items: preview.lines.into_iter().map(Into::into).collect(),
                skipped: preview.skipped.into_iter().map(Into::into).collect(),
                subtotal: preview.totals.subtotal,
                shipping_fee: preview.totals.shipping_fee,
                total_price: preview.totals.total,
                selected_address: preview.address.into(),
            },
        }
    }
}

/// Checkout Preview Handler
///
/// Prices the active cart against a delivery address: the one named in
/// the query, or the account's default. Nothing is written; the shopper
/// can re-quote as often as they like.
#[endpoint(
    tags("checkout"),
    summary = "Checkout Preview",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    address: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<PreviewResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let preview = state
        .app
        .checkout
        .preview(account.uuid, address.into_inner().map(Into::into))
        .await
        .map_err(into_api_error)?;

    Ok(Json(preview.into()))
}
