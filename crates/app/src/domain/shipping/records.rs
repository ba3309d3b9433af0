//! Shipping Rate Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use agora::shipping::{FeeTier, ScheduleError};

use crate::uuids::TypedUuid;

/// Shipping Rate UUID
pub type ShippingRateUuid = TypedUuid<ShippingRateRecord>;

/// One stored fee bracket. Bounds are inclusive kilometres; fees are đồng.
#[derive(Debug, Clone)]
pub struct ShippingRateRecord {
    pub uuid: ShippingRateUuid,
    pub from_km: u32,
    pub to_km: u32,
    pub base_fee: u64,
    pub per_km_fee: u64,
    pub status: RateStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ShippingRateRecord {
    /// The quoting-engine view of this rate.
    pub fn to_tier(&self) -> Result<FeeTier, ScheduleError> {
        FeeTier::over_kilometres(self.from_km, self.to_km, self.base_fee, self.per_km_fee)
    }
}

/// Whether a rate participates in quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateStatus {
    Active,
    Inactive,
}

impl RateStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for RateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateStatus {
    type Err = ParseRateStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(ParseRateStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown rate status: {0}")]
pub struct ParseRateStatusError(String);
