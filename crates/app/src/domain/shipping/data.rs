//! Shipping Rate Data Transfer Objects

use crate::domain::shipping::records::{RateStatus, ShippingRateUuid};

/// New Shipping Rate
#[derive(Debug, Clone)]
pub struct NewShippingRate {
    pub uuid: ShippingRateUuid,
    pub from_km: u32,
    pub to_km: u32,
    pub base_fee: u64,
    pub per_km_fee: u64,
    pub status: RateStatus,
}
