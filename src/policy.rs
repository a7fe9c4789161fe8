//! Planning policy: the fixed thresholds and their overridable bundle.

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    error::InputError,
    quantity::{distance::NauticalMiles, time::Days},
};

/// Sailing days that must remain on board for every fuel type at any point of the voyage.
pub const DEFAULT_SAFETY_MARGIN: Days = Days::new(3.0);

/// Departure ports are looked for within this leading fraction of the route.
pub const DEPARTURE_WINDOW: f64 = 0.20;

/// Mid-voyage ports must lie within this route progress range.
pub const MID_VOYAGE_MIN_PROGRESS: f64 = 0.30;
pub const MID_VOYAGE_MAX_PROGRESS: f64 = 0.80;

/// Mid-voyage ports closer to this route progress are tried first.
pub const TARGET_PROGRESS: f64 = 0.50;

/// Maximal distance between a port and the route.
pub const MAX_DEVIATION: NauticalMiles = NauticalMiles::new(100.0);

/// LSMGO to VLSFO price ratio used when a port quotes only one of them.
pub const LSMGO_PRICE_RATIO: f64 = 1.4;

/// Number of ranked plans offered to the caller.
pub const MAX_RANKED_PLANS: usize = 3;

#[derive(Copy, Clone, Debug, Builder, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Policy {
    #[builder(default = DEFAULT_SAFETY_MARGIN)]
    pub safety_margin: Days,

    #[builder(default = DEPARTURE_WINDOW)]
    pub departure_window: f64,

    #[builder(default = MID_VOYAGE_MIN_PROGRESS)]
    pub mid_voyage_min_progress: f64,

    #[builder(default = MID_VOYAGE_MAX_PROGRESS)]
    pub mid_voyage_max_progress: f64,

    #[builder(default = TARGET_PROGRESS)]
    pub target_progress: f64,

    #[builder(default = MAX_DEVIATION)]
    pub max_deviation: NauticalMiles,

    #[builder(default = MAX_RANKED_PLANS)]
    pub max_ranked_plans: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Policy {
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.safety_margin.is_non_negative() {
            return Err(InputError::InvalidSafetyMargin(self.safety_margin));
        }
        for (name, value) in [
            ("departure window", self.departure_window),
            ("mid-voyage minimal progress", self.mid_voyage_min_progress),
            ("mid-voyage maximal progress", self.mid_voyage_max_progress),
            ("target progress", self.target_progress),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InputError::InvalidProgress { name, value });
            }
        }
        if self.mid_voyage_min_progress > self.mid_voyage_max_progress {
            return Err(InputError::EmptyMidVoyageWindow {
                min: self.mid_voyage_min_progress,
                max: self.mid_voyage_max_progress,
            });
        }
        if !self.max_deviation.is_non_negative() {
            return Err(InputError::InvalidMaxDeviation(self.max_deviation));
        }
        if self.max_ranked_plans == 0 {
            return Err(InputError::NoRankedPlans);
        }
        Ok(())
    }

    /// Whether the route progress falls into the mid-voyage window.
    #[must_use]
    pub fn is_mid_voyage(&self, progress: f64) -> bool {
        (self.mid_voyage_min_progress..=self.mid_voyage_max_progress).contains(&progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_uses_the_constants() {
        let policy = Policy::default();
        assert_eq!(policy.safety_margin, DEFAULT_SAFETY_MARGIN);
        assert_eq!(policy.max_deviation, MAX_DEVIATION);
        assert_eq!(policy.max_ranked_plans, 3);
    }

    #[test]
    fn mid_voyage_window_is_inclusive() {
        let policy = Policy::default();
        assert!(policy.is_mid_voyage(0.3));
        assert!(policy.is_mid_voyage(0.8));
        assert!(!policy.is_mid_voyage(0.29));
        assert!(!policy.is_mid_voyage(0.81));
    }

    #[test]
    fn rejects_negative_margin() {
        let policy = Policy::builder().safety_margin(Days::new(-1.0)).build();
        assert_eq!(policy.validate(), Err(InputError::InvalidSafetyMargin(Days::new(-1.0))));
    }

    #[test]
    fn default_policy_is_valid() {
        assert_eq!(Policy::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_mid_voyage_window() {
        let policy =
            Policy::builder().mid_voyage_min_progress(0.8).mid_voyage_max_progress(0.3).build();
        assert_eq!(
            policy.validate(),
            Err(InputError::EmptyMidVoyageWindow { min: 0.8, max: 0.3 }),
        );
    }

    #[test]
    fn rejects_progress_outside_the_route() {
        let policy = Policy::builder().departure_window(1.5).build();
        assert!(matches!(
            policy.validate(),
            Err(InputError::InvalidProgress { name: "departure window", .. }),
        ));
        let policy = Policy::builder().target_progress(f64::NAN).build();
        assert!(matches!(policy.validate(), Err(InputError::InvalidProgress { .. })));
    }

    #[test]
    fn rejects_negative_max_deviation() {
        let policy = Policy::builder().max_deviation(NauticalMiles::new(-10.0)).build();
        assert_eq!(
            policy.validate(),
            Err(InputError::InvalidMaxDeviation(NauticalMiles::new(-10.0))),
        );
    }

    #[test]
    fn rejects_zero_ranked_plans() {
        let policy = Policy::builder().max_ranked_plans(0).build();
        assert_eq!(policy.validate(), Err(InputError::NoRankedPlans));
    }
}
