//! Place Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use agora_app::domain::{
    orders::{OrdersServiceError, data::PlaceOrder, records::OrderUuid},
    payments::records::PaymentMethod,
};

use crate::{errors::ApiError, extensions::*, orders::errors::into_api_error, state::State};

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub recipient: String,
    pub email: String,
    pub phone: String,

    /// One of the buyer's own addresses. No default fallback here.
    pub address_uuid: Uuid,

    /// `momo` or `cod`
    pub payment_method: String,
}

/// The pricing snapshot the order was placed at.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPricingData {
    pub subtotal: u64,
    pub shipping_fee: u64,
    pub total_price: u64,
    pub payment_method: String,
}

/// Place Order Response
///
/// A gateway failure after the order is stored still answers with the
/// order uuid, so the shopper can retry the payment later.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderResponse {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_uuid: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OrderPricingData>,

    /// Where to send the shopper to pay, for gateway payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_url: Option<String>,
}

/// Place Order Handler
///
/// Turns the active cart into an order: prices and stock are taken now,
/// the cart is emptied and a pending payment is opened.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Total outside payment range"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Order stored, payment gateway failed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let account = depot.current_account_or_401()?;

    let request = json.into_inner();

    if request.recipient.trim().is_empty()
        || request.email.trim().is_empty()
        || request.phone.trim().is_empty()
    {
        return Err(ApiError::bad_request().brief("Recipient, email and phone are required"));
    }

    let payment_method: PaymentMethod = request.payment_method.parse().map_err(|_unsupported| {
        ApiError::bad_request().brief("Payment method must be momo or cod")
    })?;

    let order = PlaceOrder {
        uuid: OrderUuid::new(),
        recipient: request.recipient,
        email: request.email,
        phone: request.phone,
        address_uuid: request.address_uuid.into(),
        payment_method,
    };

    match state.app.orders.place_order(account.uuid, order).await {
        Ok(placed) => {
            res.status_code(StatusCode::CREATED);

            Ok(Json(PlaceOrderResponse {
                success: true,
                message: "Order placed".to_owned(),
                order_uuid: Some(placed.uuid.into()),
                data: Some(OrderPricingData {
                    subtotal: placed.totals.subtotal,
                    shipping_fee: placed.totals.shipping_fee,
                    total_price: placed.totals.total,
                    payment_method: placed.payment_method.to_string(),
                }),
                pay_url: placed.pay_url,
            }))
        }
        Err(OrdersServiceError::Gateway { order, source }) => {
            error!("payment gateway failed for order {order}: {source}");

            res.status_code(StatusCode::BAD_GATEWAY);

            Ok(Json(PlaceOrderResponse {
                success: false,
                message: "Order placed but the payment could not be started".to_owned(),
                order_uuid: Some(order.into()),
                data: None,
                pay_url: None,
            }))
        }
        Err(error) => Err(into_api_error(error)),
    }
}
