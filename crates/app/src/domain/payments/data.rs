//! Payment Data

use crate::domain::{
    orders::records::OrderUuid,
    payments::records::{PaymentMethod, PaymentUuid},
};

/// New Payment Data
///
/// `request_id` is the correlation id quoted to the gateway; cash on
/// delivery has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub method: PaymentMethod,
    pub amount: u64,
    pub request_id: Option<String>,
}
