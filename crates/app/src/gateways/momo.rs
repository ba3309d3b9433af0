//! MoMo payment gateway client.
//!
//! Payment creation is a signed POST: an HMAC-SHA256 over the request's
//! parameters in alphabetical key order, hex encoded, travels alongside
//! them. The wallet answers with a `payUrl` to redirect the shopper to
//! and reports the eventual outcome asynchronously on the IPN route;
//! this client only opens payments.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const REQUEST_TYPE: &str = "captureWallet";

/// Gateway account and routing configuration.
#[derive(Debug, Clone)]
pub struct MomoConfig {
    /// Payment-creation endpoint, e.g.
    /// `"https://test-payment.momo.vn/v2/gateway/api/create"`.
    pub endpoint: String,

    pub partner_code: String,
    pub access_key: String,
    pub secret_key: String,

    /// Where the wallet sends the shopper after paying.
    pub redirect_url: String,

    /// Where the wallet posts the asynchronous result.
    pub ipn_url: String,
}

/// One payment to open with the wallet.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub order_id: String,
    pub request_id: String,
    pub amount: u64,
    pub order_info: String,
}

/// Payment-creation operations used by order placement.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment and return the URL to send the shopper to.
    async fn create_payment(&self, payment: PaymentRequest) -> Result<String, MomoError>;
}

/// HTTP client for the MoMo e-wallet creation API.
#[derive(Debug, Clone)]
pub struct MomoClient {
    config: MomoConfig,
    http: Client,
}

impl MomoClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: MomoConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for MomoClient {
    async fn create_payment(&self, payment: PaymentRequest) -> Result<String, MomoError> {
        let signature = sign(
            &self.config.secret_key,
            &canonical_string(&self.config, &payment),
        )?;

        let body = CreateRequest {
            partner_code: &self.config.partner_code,
            access_key: &self.config.access_key,
            request_id: &payment.request_id,
            amount: payment.amount,
            order_id: &payment.order_id,
            order_info: &payment.order_info,
            redirect_url: &self.config.redirect_url,
            ipn_url: &self.config.ipn_url,
            extra_data: "",
            request_type: REQUEST_TYPE,
            signature: &signature,
            lang: "vi",
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MomoError::UnexpectedResponse(format!(
                "create request failed with status {status}: {text}"
            )));
        }

        let parsed: CreateResponse = response.json().await?;

        if parsed.result_code != 0 {
            return Err(MomoError::Declined {
                result_code: parsed.result_code,
                message: parsed.message,
            });
        }

        match parsed.pay_url {
            Some(pay_url) => Ok(pay_url),
            None => Err(MomoError::UnexpectedResponse(
                "response carried no payUrl".to_string(),
            )),
        }
    }
}

/// The signed parameter string: every field of the creation request, in
/// alphabetical key order.
fn canonical_string(config: &MomoConfig, payment: &PaymentRequest) -> String {
    format!(
        "accessKey={}&amount={}&extraData=&ipnUrl={}&orderId={}&orderInfo={}&partnerCode={}&redirectUrl={}&requestId={}&requestType={REQUEST_TYPE}",
        config.access_key,
        payment.amount,
        config.ipn_url,
        payment.order_id,
        payment.order_info,
        config.partner_code,
        config.redirect_url,
        payment.request_id,
    )
}

/// HMAC-SHA256 over `message` with the partner secret, hex encoded.
fn sign(secret: &str, message: &str) -> Result<String, MomoError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(message.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    partner_code: &'a str,
    access_key: &'a str,
    request_id: &'a str,
    amount: u64,
    order_id: &'a str,
    order_info: &'a str,
    redirect_url: &'a str,
    ipn_url: &'a str,
    extra_data: &'a str,
    request_type: &'a str,
    signature: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    result_code: i64,

    #[serde(default)]
    message: String,

    #[serde(default)]
    pay_url: Option<String>,
}

/// Errors opening a payment with the wallet.
#[derive(Debug, Error)]
pub enum MomoError {
    /// The wallet refused the payment (non-zero result code).
    #[error("gateway declined the payment ({result_code}): {message}")]
    Declined { result_code: i64, message: String },

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("signing failed: {0}")]
    Signing(#[from] hmac::digest::InvalidLength),

    /// A non-2xx response or a body outside the gateway contract.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),
}
