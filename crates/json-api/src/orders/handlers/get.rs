//! Order Detail Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora::status::StatusEntry;
use agora_app::domain::orders::records::{OrderDetail, OrderLineRecord};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, index::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailResponse {
    /// The order row itself
    pub order: OrderResponse,

    /// The priced lines snapshotted at placement
    pub items: Vec<OrderLineResponse>,

    /// The status trail, oldest first
    pub history: Vec<StatusEntryResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        OrderDetailResponse {
            order: detail.order.into(),
            items: detail.lines.into_iter().map(Into::into).collect(),
            history: detail.history.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    /// The product's UUID
    pub product_uuid: Uuid,

    /// The product's title, as currently listed
    pub title: String,

    /// The product's image, if it has one
    pub image_url: Option<String>,

    /// The undiscounted unit price at placement, in VND
    pub unit_price: u64,

    /// The discount applied at placement, 0 to 100
    pub discount_percent: u8,

    /// How many units were bought
    pub quantity: u32,
}

impl From<OrderLineRecord> for OrderLineResponse {
    fn from(line: OrderLineRecord) -> Self {
        OrderLineResponse {
            product_uuid: line.product_uuid.into(),
            title: line.title,
            image_url: line.image_url,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusEntryResponse {
    /// The status label
    pub status: String,

    /// When the order entered this status
    pub at: String,
}

impl From<StatusEntry> for StatusEntryResponse {
    fn from(entry: StatusEntry) -> Self {
        StatusEntryResponse {
            status: entry.status.to_string(),
            at: entry.at.to_string(),
        }
    }
}

/// Order Detail Handler
///
/// Returns one order with its lines and status trail. Buyers can only
/// fetch their own orders; staff can fetch any.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let detail = state
        .app
        .orders
        .get_order(account, uuid.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Json(detail.into()))
}
