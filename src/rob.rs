//! Remaining-on-board simulation over legs and bunkering events.

mod trace;

use bon::Builder;
use serde::{Deserialize, Serialize};

pub use self::trace::{Action, LowPoint, RobTrace, Violation, Waypoint};
use crate::{
    consumption::average_daily,
    error::InputError,
    fuel::{FuelQuantity, FuelRates, FuelType},
    policy::DEFAULT_SAFETY_MARGIN,
    prelude::*,
    quantity::{distance::NauticalMiles, mass::MetricTons, time::Days},
    vessel::validate_tanks,
};

/// Rounding slack for the threshold comparisons.
const ROB_TOLERANCE: MetricTons = MetricTons::new(1e-6);
const MARGIN_TOLERANCE: Days = Days::new(1e-6);

/// Stretch of the voyage sailed at constant daily rates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub distance: NauticalMiles,
    pub duration: Days,
    pub daily: FuelRates,
}

impl Leg {
    pub fn consumption(&self) -> FuelQuantity {
        self.daily * self.duration
    }
}

/// Where a bunkering event happens relative to the legs.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BunkerPoint {
    BeforeDeparture,

    /// After the leg with the given index has been sailed.
    AfterLeg(usize),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BunkerEvent {
    pub at: BunkerPoint,
    pub port: String,
    pub quantity: FuelQuantity,
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Simulator<'a> {
    initial_rob: FuelQuantity,
    capacity: FuelQuantity,
    legs: &'a [Leg],

    #[builder(default)]
    bunkers: &'a [BunkerEvent],

    /// Required sailing days on board.
    #[builder(default = DEFAULT_SAFETY_MARGIN)]
    safety_margin: Days,
}

impl<S: simulator_builder::IsComplete> SimulatorBuilder<'_, S> {
    pub fn run(self) -> Result<RobTrace, InputError> {
        self.build().run()
    }
}

impl Simulator<'_> {
    #[instrument(skip_all, fields(n_legs = self.legs.len(), n_bunkers = self.bunkers.len()))]
    fn run(self) -> Result<RobTrace, InputError> {
        self.validate()?;

        let reference_rates = average_daily(
            self.legs.iter().map(Leg::consumption).sum(),
            self.legs.iter().map(|leg| leg.duration).sum(),
        );
        let mut walk = Walk {
            rob: self.initial_rob,
            capacity: self.capacity,
            reference_rates,
            required_margin: self.safety_margin,
            waypoints: Vec::with_capacity(1 + self.legs.len() + self.bunkers.len()),
            violations: Vec::new(),
        };

        let origin = self.legs.first().map_or("origin", |leg| leg.from.as_str());
        if !self.apply_bunkers(&mut walk, BunkerPoint::BeforeDeparture) {
            walk.record(origin, NauticalMiles::ZERO, Action::None);
        }
        for (index, leg) in self.legs.iter().enumerate() {
            let quantity = leg.consumption();
            let action = if quantity == FuelQuantity::ZERO {
                Action::None
            } else {
                Action::Consume { quantity }
            };
            walk.record(&leg.to, leg.distance, action);
            self.apply_bunkers(&mut walk, BunkerPoint::AfterLeg(index));
        }

        let trace = walk.finish();
        debug!(
            final_rob = %trace.final_rob,
            n_violations = trace.violations.len(),
            is_safe = trace.is_safe,
            "simulated",
        );
        Ok(trace)
    }

    /// Apply the events at the given point and tell whether there were any.
    fn apply_bunkers(&self, walk: &mut Walk, at: BunkerPoint) -> bool {
        let mut any = false;
        for event in self.bunkers.iter().filter(|event| event.at == at) {
            walk.record(
                &event.port,
                NauticalMiles::ZERO,
                Action::Bunker { requested: event.quantity, received: FuelQuantity::ZERO },
            );
            any = true;
        }
        any
    }

    fn validate(&self) -> Result<(), InputError> {
        validate_tanks(self.initial_rob, self.capacity)?;
        if !self.safety_margin.is_non_negative() {
            return Err(InputError::InvalidSafetyMargin(self.safety_margin));
        }
        for leg in self.legs {
            if !leg.duration.is_non_negative() {
                return Err(InputError::InvalidDuration {
                    leg: format!("{} → {}", leg.from, leg.to),
                    duration: leg.duration,
                });
            }
        }
        for event in self.bunkers {
            for (fuel, quantity) in event.quantity.iter() {
                if !quantity.is_non_negative() {
                    return Err(InputError::InvalidBunkerQuantity {
                        port: event.port.clone(),
                        fuel,
                        quantity,
                    });
                }
            }
            if let BunkerPoint::AfterLeg(index) = event.at
                && index >= self.legs.len()
            {
                return Err(InputError::BunkerOutOfRange {
                    port: event.port.clone(),
                    index,
                    n_legs: self.legs.len(),
                });
            }
        }
        Ok(())
    }
}

/// Running state of a simulation.
struct Walk {
    rob: FuelQuantity,
    capacity: FuelQuantity,
    reference_rates: FuelRates,
    required_margin: Days,
    waypoints: Vec<Waypoint>,
    violations: Vec<Violation>,
}

impl Walk {
    /// Apply the action and append the resulting waypoint.
    ///
    /// A requested bunker is capped at the free capacity, the received quantity is filled in here.
    fn record(&mut self, location: &str, distance: NauticalMiles, mut action: Action) {
        let index = self.waypoints.len();
        let n_violations = self.violations.len();
        let rob_before = self.rob;

        match &mut action {
            Action::None => {}
            Action::Consume { quantity } => {
                // Not clamped, the shortage stays visible:
                self.rob -= *quantity;
                for (fuel, rob) in self.rob.iter() {
                    if rob < -ROB_TOLERANCE {
                        self.violations.push(Violation::NegativeRob {
                            waypoint: index,
                            location: location.to_string(),
                            fuel,
                            rob,
                        });
                    }
                }
            }
            Action::Bunker { requested, received } => {
                let available = (self.capacity - self.rob).non_negative();
                *received = (*requested).min(available);
                self.rob += *received;
                for fuel in FuelType::all() {
                    if requested.get(fuel) > available.get(fuel) + ROB_TOLERANCE {
                        self.violations.push(Violation::CapacityExceeded {
                            waypoint: index,
                            location: location.to_string(),
                            fuel,
                            requested: requested.get(fuel),
                            available: available.get(fuel),
                        });
                    }
                }
            }
        }

        let safety_margin = self.rob.endurance(self.reference_rates);
        let is_critical = self.violations[n_violations..].iter().any(Violation::is_critical);
        if !is_critical && safety_margin < self.required_margin - MARGIN_TOLERANCE {
            self.violations.push(Violation::MarginBelowThreshold {
                waypoint: index,
                location: location.to_string(),
                margin: safety_margin,
                required: self.required_margin,
            });
        }
        if self.violations.len() > n_violations {
            let violations = &self.violations[n_violations..];
            warn!(index, location, ?violations, "unsafe waypoint");
        }

        self.waypoints.push(Waypoint {
            location: location.to_string(),
            distance,
            rob_before,
            rob_after: self.rob,
            action,
            safety_margin,
            is_safe: self.violations.len() == n_violations,
        });
    }

    fn finish(self) -> RobTrace {
        let lowest = self
            .waypoints
            .iter()
            .enumerate()
            .min_by_key(|(_, waypoint)| waypoint.rob_after.total())
            .map(|(index, waypoint)| LowPoint {
                waypoint: index,
                location: waypoint.location.clone(),
                rob: waypoint.rob_after,
            });
        RobTrace {
            final_rob: self.rob,
            lowest,
            is_safe: self.violations.is_empty(),
            reference_rates: self.reference_rates,
            required_margin: self.required_margin,
            waypoints: self.waypoints,
            violations: self.violations,
        }
    }
}
