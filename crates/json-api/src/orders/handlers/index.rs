//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use agora_app::{
    domain::orders::records::OrderRecord,
    pagination::{Page, PageRequest},
};

use crate::{errors::ApiError, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The requested page of the account's orders, newest first
    pub orders: Vec<OrderResponse>,

    /// 1-based page number
    pub page: u32,

    /// Page size actually applied
    pub per_page: u32,

    /// How many orders the account has in total
    pub total: u64,
}

impl From<Page<OrderRecord>> for OrdersResponse {
    fn from(page: Page<OrderRecord>) -> Self {
        OrdersResponse {
            orders: page.items.into_iter().map(Into::into).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The order's UUID
    pub uuid: uuid::Uuid,

    /// Who receives the parcel
    pub recipient: String,

    /// Contact email snapshotted at placement
    pub email: String,

    /// Contact phone snapshotted at placement
    pub phone: String,

    /// The delivery address line snapshotted at placement
    pub address_line: String,

    /// How the buyer pays, `momo` or `cod`
    pub payment_method: String,

    /// Settlement state, `pending`, `completed` or `failed`
    pub payment_status: String,

    /// Sum of discounted line totals in VND
    pub subtotal: u64,

    /// The delivery fee in VND
    pub shipping_fee: u64,

    /// What the buyer owes in VND
    pub total: u64,

    /// When the order was placed
    pub created_at: String,

    /// When the order last changed
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            recipient: order.recipient,
            email: order.email,
            phone: order.phone,
            address_line: order.address_line,
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            total: order.total,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Index Handler
///
/// Returns a page of the signed-in account's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("session_cookie" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let page = PageRequest::new(
        page.into_inner().unwrap_or(1),
        per_page
            .into_inner()
            .unwrap_or(PageRequest::DEFAULT_PER_PAGE),
    );

    let orders = state
        .app
        .orders
        .list_orders(account.uuid, page)
        .await
        .or_500("failed to fetch orders")?;

    Ok(Json(orders.into()))
}
