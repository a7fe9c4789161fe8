use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{
    fuel::{FuelQuantity, FuelRates, FuelType},
    quantity::{distance::NauticalMiles, mass::MetricTons, time::Days},
};

/// What happened to the fuel on board at a waypoint.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// The state is recorded without any change.
    None,

    Consume {
        quantity: FuelQuantity,
    },

    Bunker {
        requested: FuelQuantity,

        /// Actually received, limited by the free tank capacity.
        received: FuelQuantity,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Waypoint {
    pub location: String,

    /// Sailed since the previous waypoint.
    pub distance: NauticalMiles,

    pub rob_before: FuelQuantity,
    pub rob_after: FuelQuantity,
    pub action: Action,

    /// Sailing days left on board after the action.
    pub safety_margin: Days,

    pub is_safe: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Running out of fuel.
    NegativeRob { waypoint: usize, location: String, fuel: FuelType, rob: MetricTons },

    MarginBelowThreshold { waypoint: usize, location: String, margin: Days, required: Days },

    /// The bunker did not fit into the tank.
    CapacityExceeded {
        waypoint: usize,
        location: String,
        fuel: FuelType,
        requested: MetricTons,
        available: MetricTons,
    },
}

impl Violation {
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Self::NegativeRob { .. })
    }

    #[must_use]
    pub const fn waypoint(&self) -> usize {
        match self {
            Self::NegativeRob { waypoint, .. }
            | Self::MarginBelowThreshold { waypoint, .. }
            | Self::CapacityExceeded { waypoint, .. } => *waypoint,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeRob { location, fuel, rob, .. } => {
                write!(f, "{fuel} runs out at {location}: {rob} on board")
            }
            Self::MarginBelowThreshold { location, margin, required, .. } => {
                write!(f, "safety margin at {location} is {margin}, required {required}")
            }
            Self::CapacityExceeded { location, fuel, requested, available, .. } => {
                write!(f, "requested {requested} of {fuel} at {location}, only {available} fits")
            }
        }
    }
}

/// The waypoint with the least total fuel on board.
#[derive(Clone, Debug, Serialize)]
pub struct LowPoint {
    pub waypoint: usize,
    pub location: String,
    pub rob: FuelQuantity,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RobTrace {
    pub waypoints: Vec<Waypoint>,
    pub final_rob: FuelQuantity,
    pub lowest: Option<LowPoint>,
    pub violations: Vec<Violation>,

    /// Daily rates the safety margins are measured against.
    pub reference_rates: FuelRates,

    pub required_margin: Days,
    pub is_safe: bool,
}

impl RobTrace {
    pub fn critical_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|violation| violation.is_critical())
    }

    pub fn total_bunkered(&self) -> FuelQuantity {
        self.waypoints
            .iter()
            .filter_map(|waypoint| match waypoint.action {
                Action::Bunker { received, .. } => Some(received),
                Action::None | Action::Consume { .. } => None,
            })
            .sum()
    }

    pub fn total_consumed(&self) -> FuelQuantity {
        self.waypoints
            .iter()
            .filter_map(|waypoint| match waypoint.action {
                Action::Consume { quantity } => Some(quantity),
                Action::None | Action::Bunker { .. } => None,
            })
            .sum()
    }

    /// The smallest safety margin along the voyage.
    pub fn min_margin(&self) -> Days {
        self.waypoints.iter().map(|waypoint| waypoint.safety_margin).min().unwrap_or(Days::INFINITY)
    }
}
