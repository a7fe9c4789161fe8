use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    fuel::{FuelQuantity, PerFuel},
    price::ResolvedPrice,
    quantity::{cost::Usd, distance::NauticalMiles},
    rob::{RobTrace, Violation},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRole {
    Departure,
    MidVoyage,
}

impl Display for StopRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Departure => write!(f, "departure"),
            Self::MidVoyage => write!(f, "mid-voyage"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BunkerStop {
    pub role: StopRole,
    pub port_code: String,
    pub port_name: String,
    pub along_route: NauticalMiles,
    pub progress: f64,
    pub deviation: NauticalMiles,

    /// Received at the port.
    pub quantity: FuelQuantity,

    pub rob_before: FuelQuantity,
    pub rob_after: FuelQuantity,
    pub prices: PerFuel<ResolvedPrice>,
    pub cost: Usd,
}

/// Validated bunkering plan: the departure stop, and possibly a mid-voyage one.
#[derive(Clone, Debug, Serialize)]
pub struct MultiStopPlan {
    pub stops: Vec<BunkerStop>,
    pub fuel_cost: Usd,
    pub deviation_cost: Usd,
    pub total_cost: Usd,
    pub final_rob: FuelQuantity,
    pub is_safe: bool,
    pub trace: RobTrace,

    /// Assigned by the ranking, starting from 1.
    pub rank: Option<usize>,

    /// Compared to the most expensive valid plan.
    pub savings: Usd,
}

impl MultiStopPlan {
    pub fn combined_deviation(&self) -> NauticalMiles {
        self.stops.iter().map(|stop| stop.deviation).sum()
    }

    pub fn total_bunkered(&self) -> FuelQuantity {
        self.stops.iter().map(|stop| stop.quantity).sum()
    }

    #[must_use]
    pub fn last_port_code(&self) -> Option<&str> {
        self.stops.last().map(|stop| stop.port_code.as_str())
    }

    #[must_use]
    pub fn route_label(&self) -> String {
        self.stops.iter().map(|stop| stop.port_code.as_str()).join(" → ")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The candidate is not ahead of the departure port.
    BeforeDeparture,

    /// The vessel would arrive at the port with less than the buffer.
    Unreachable { rob_on_arrival: FuelQuantity, buffer: FuelQuantity },

    /// The plan was calculated, but the simulation found violations.
    Unsafe { violations: Vec<Violation> },

    Unpriced,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeforeDeparture => write!(f, "not ahead of the departure port"),
            Self::Unreachable { rob_on_arrival, buffer } => {
                write!(f, "cannot safely reach: {rob_on_arrival} on arrival, {buffer} required")
            }
            Self::Unsafe { violations } => match violations.first() {
                Some(violation) if violations.len() == 1 => write!(f, "unsafe: {violation}"),
                Some(violation) => {
                    write!(f, "unsafe: {violation}, and {} more", violations.len() - 1)
                }
                None => write!(f, "unsafe"),
            },
            Self::Unpriced => write!(f, "no fuel price"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RejectedCandidate {
    pub port_code: String,
    pub reason: Rejection,
}
