//! MoMo Callback Handler
//!
//! The gateway sends the buyer back here after the payment attempt, with
//! the outcome in the query string. Parameter names are the gateway's
//! own, so they are read by hand rather than through extractors.

use std::sync::Arc;

use salvo::{prelude::*, writing::Redirect};
use serde_json::json;
use uuid::Uuid;

use agora_app::domain::payments::records::GatewayResult;

use crate::{errors::ApiError, extensions::*, payments::errors::into_api_error, state::State};

/// MoMo Callback Handler
///
/// Applies the reported outcome to the payment and its order, then sends
/// the buyer on to the storefront's thank-you page. Failure codes answer
/// with the gateway's own message instead of redirecting.
#[endpoint(tags("payments"), summary = "MoMo Payment Callback")]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = req
        .query::<Uuid>("orderId")
        .ok_or_else(|| ApiError::bad_request().brief("Missing or malformed orderId"))?;

    let result_code = req
        .query::<i64>("resultCode")
        .ok_or_else(|| ApiError::bad_request().brief("Missing or malformed resultCode"))?;

    let transaction_id = req.query::<String>("transId");
    let message = req.query::<String>("message");
    let response_time = req.query::<String>("responseTime");

    let raw = json!({
        "orderId": order,
        "resultCode": result_code,
        "transId": &transaction_id,
        "message": &message,
        "responseTime": response_time,
    });

    let note = message.clone();

    let result = GatewayResult {
        result_code,
        transaction_id,
        message,
        raw,
    };

    state
        .app
        .payments
        .apply_gateway_result(order.into(), result)
        .await
        .map_err(into_api_error)?;

    if result_code == 0 {
        res.render(Redirect::found(state.thank_you_url.as_str()));
        return Ok(());
    }

    Err(match note {
        Some(note) => ApiError::payment_required().brief(note),
        None => ApiError::payment_required(),
    })
}
