//! Shipping fees
//!
//! A [`FeeSchedule`] is a set of non-overlapping kilometre brackets plus a
//! flat fallback fee. Quoting never fails: distances outside every bracket
//! get the fallback, non-positive distances ship free. Bracket bounds are
//! held in metres so all fee arithmetic stays integral.

use thiserror::Error;

use crate::money::round_to_thousand;

const METRES_PER_KM: u64 = 1_000;

/// One shipping-fee bracket over an inclusive kilometre range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTier {
    from_m: u64,
    to_m: u64,
    base_fee: u64,
    per_km_fee: u64,
}

impl FeeTier {
    /// Build a tier from inclusive kilometre bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvertedBounds`] when `to_km < from_km`.
    pub fn over_kilometres(
        from_km: u32,
        to_km: u32,
        base_fee: u64,
        per_km_fee: u64,
    ) -> Result<Self, ScheduleError> {
        if to_km < from_km {
            return Err(ScheduleError::InvertedBounds { from_km, to_km });
        }

        Ok(Self {
            from_m: u64::from(from_km) * METRES_PER_KM,
            to_m: u64::from(to_km) * METRES_PER_KM,
            base_fee,
            per_km_fee,
        })
    }

    fn contains(&self, distance_m: u64) -> bool {
        (self.from_m..=self.to_m).contains(&distance_m)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.from_m <= other.to_m && other.from_m <= self.to_m
    }

    /// Base fee plus the per-kilometre component for the distance beyond
    /// the bracket start, rounded half-up to the nearest đồng.
    fn fee_at(&self, distance_m: u64) -> u64 {
        let beyond_m = distance_m.saturating_sub(self.from_m);

        self.base_fee + (beyond_m * self.per_km_fee + METRES_PER_KM / 2) / METRES_PER_KM
    }
}

/// A validated set of fee tiers with a fallback fee for uncovered distances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
    fallback_fee: u64,
}

impl FeeSchedule {
    /// Assemble a schedule, rejecting overlapping tiers. Gaps are legal;
    /// distances falling into one are served by the fallback fee.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Overlap`] when two tiers share any distance
    /// (inclusive bounds, so tiers meeting at an exact kilometre overlap).
    pub fn new(mut tiers: Vec<FeeTier>, fallback_fee: u64) -> Result<Self, ScheduleError> {
        tiers.sort_by_key(|tier| tier.from_m);

        for pair in tiers.windows(2) {
            if let [left, right] = pair
                && left.overlaps(right)
            {
                return Err(ScheduleError::Overlap {
                    first_from_m: left.from_m,
                    second_from_m: right.from_m,
                });
            }
        }

        Ok(Self {
            tiers,
            fallback_fee,
        })
    }

    /// Quote the shipping fee for a drive distance in metres.
    #[must_use]
    pub fn quote(&self, distance_m: i64) -> ShippingQuote {
        let Ok(distance_m) = u64::try_from(distance_m) else {
            return ShippingQuote::Free;
        };

        if distance_m == 0 {
            return ShippingQuote::Free;
        }

        match self.tiers.iter().find(|tier| tier.contains(distance_m)) {
            Some(tier) => ShippingQuote::Tiered {
                fee: round_to_thousand(tier.fee_at(distance_m)),
            },
            None => ShippingQuote::Fallback {
                fee: round_to_thousand(self.fallback_fee),
            },
        }
    }
}

/// Outcome of a fee quote. Callers that only need the amount can use
/// [`ShippingQuote::fee`]; the variants stay distinguishable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingQuote {
    /// Non-positive distance: nothing to charge.
    Free,

    /// Distance matched a tier.
    Tiered { fee: u64 },

    /// No tier covered the distance; the flat fallback applies.
    Fallback { fee: u64 },
}

impl ShippingQuote {
    /// The quoted amount in đồng.
    #[must_use]
    pub fn fee(&self) -> u64 {
        match self {
            Self::Free => 0,
            Self::Tiered { fee } | Self::Fallback { fee } => *fee,
        }
    }
}

/// Failures assembling a fee schedule. "No tier matched" is never an
/// error; that is the fallback path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("tier bounds are inverted: {from_km}km..{to_km}km")]
    InvertedBounds { from_km: u32, to_km: u32 },

    #[error("tiers starting at {first_from_m}m and {second_from_m}m overlap")]
    Overlap {
        first_from_m: u64,
        second_from_m: u64,
    },
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn schedule() -> TestResult<FeeSchedule> {
        Ok(FeeSchedule::new(
            vec![
                FeeTier::over_kilometres(0, 10, 50_000, 2_000)?,
                FeeTier::over_kilometres(11, 50, 80_000, 1_500)?,
            ],
            30_000,
        )?)
    }

    #[test]
    fn zero_and_negative_distances_ship_free() -> TestResult {
        let schedule = schedule()?;

        assert_eq!(schedule.quote(0), ShippingQuote::Free);
        assert_eq!(schedule.quote(-250), ShippingQuote::Free);

        Ok(())
    }

    #[test]
    fn tier_fee_includes_per_km_component() -> TestResult {
        // 5km into the 0..10 tier: 50 000 + 5 × 2 000 = 60 000.
        let quote = schedule()?.quote(5_000);

        assert_eq!(quote, ShippingQuote::Tiered { fee: 60_000 });

        Ok(())
    }

    #[test]
    fn fee_is_rounded_to_the_nearest_thousand() -> TestResult {
        // 5.2km: 50 000 + 5.2 × 2 000 = 60 400, rounds down to 60 000.
        assert_eq!(schedule()?.quote(5_200).fee(), 60_000);

        // 5.3km: 60 600 rounds up to 61 000.
        assert_eq!(schedule()?.quote(5_300).fee(), 61_000);

        Ok(())
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() -> TestResult {
        let schedule = schedule()?;

        // Exactly 10km still belongs to the first tier.
        assert_eq!(
            schedule.quote(10_000),
            ShippingQuote::Tiered { fee: 70_000 }
        );

        // Exactly 11km starts the second tier at its base fee.
        assert_eq!(
            schedule.quote(11_000),
            ShippingQuote::Tiered { fee: 80_000 }
        );

        Ok(())
    }

    #[test]
    fn gap_between_tiers_falls_back_to_flat_fee() -> TestResult {
        // 10.5km sits in the gap between 0..10 and 11..50.
        assert_eq!(
            schedule()?.quote(10_500),
            ShippingQuote::Fallback { fee: 30_000 }
        );

        Ok(())
    }

    #[test]
    fn distance_beyond_every_tier_falls_back() -> TestResult {
        assert_eq!(
            schedule()?.quote(200_000),
            ShippingQuote::Fallback { fee: 30_000 }
        );

        Ok(())
    }

    #[test]
    fn empty_schedule_always_falls_back() -> TestResult {
        let schedule = FeeSchedule::new(Vec::new(), 25_000)?;

        assert_eq!(schedule.quote(7_000), ShippingQuote::Fallback { fee: 25_000 });

        Ok(())
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = FeeTier::over_kilometres(10, 5, 50_000, 2_000);

        assert_eq!(
            result,
            Err(ScheduleError::InvertedBounds {
                from_km: 10,
                to_km: 5
            })
        );
    }

    #[test]
    fn overlapping_tiers_are_rejected() -> TestResult {
        let tiers = vec![
            FeeTier::over_kilometres(0, 10, 50_000, 2_000)?,
            FeeTier::over_kilometres(8, 20, 60_000, 1_000)?,
        ];

        let result = FeeSchedule::new(tiers, 30_000);

        assert!(
            matches!(result, Err(ScheduleError::Overlap { .. })),
            "expected Overlap, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn tiers_meeting_at_a_kilometre_overlap() -> TestResult {
        let tiers = vec![
            FeeTier::over_kilometres(0, 10, 50_000, 2_000)?,
            FeeTier::over_kilometres(10, 20, 60_000, 1_000)?,
        ];

        let result = FeeSchedule::new(tiers, 30_000);

        assert!(
            matches!(result, Err(ScheduleError::Overlap { .. })),
            "expected Overlap for shared bound, got {result:?}"
        );

        Ok(())
    }
}
