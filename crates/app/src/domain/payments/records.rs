//! Payment Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde_json::Value;
use thiserror::Error;

use crate::{domain::orders::records::OrderUuid, uuids::TypedUuid};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Payment Record
///
/// One per order, created `pending` inside the placement transaction.
/// The gateway callback settles it; cash on delivery stays `pending`
/// until the courier collects.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub method: PaymentMethod,
    pub amount: u64,
    pub request_id: Option<String>,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub gateway_response: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Momo,
    Cod,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Momo => "momo",
            Self::Cod => "cod",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "momo" => Ok(Self::Momo),
            "cod" => Ok(Self::Cod),
            other => Err(ParsePaymentMethodError(other.to_string())),
        }
    }
}

/// Error for payment methods this shop does not take.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported payment method {0:?}")]
pub struct ParsePaymentMethodError(pub String);

/// Settlement state, mirrored onto the order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(ParsePaymentStatusError(other.to_string())),
        }
    }
}

/// Error for payment status strings the schema does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised payment status {0:?}")]
pub struct ParsePaymentStatusError(pub String);

/// What the gateway reported back for an order, as delivered to the
/// callback endpoint.
#[derive(Debug, Clone)]
pub struct GatewayResult {
    pub result_code: i64,
    pub transaction_id: Option<String>,
    pub message: Option<String>,
    pub raw: Value,
}

impl GatewayResult {
    /// The settlement state this report asks for. Zero is the gateway's
    /// only success code.
    #[must_use]
    pub fn outcome(&self) -> PaymentStatus {
        if self.result_code == 0 {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        }
    }
}
