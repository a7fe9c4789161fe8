//! Bunkering decision and the multi-stop plan search.

mod plan;
mod requirement;

use bon::Builder;
use itertools::Itertools;
use serde::Serialize;

pub use self::{
    plan::{BunkerStop, MultiStopPlan, RejectedCandidate, Rejection, StopRole},
    requirement::{FuelRequirement, Requirement},
};
use crate::{
    consumption::ConsumptionBreakdown,
    error::InputError,
    fuel::{FuelQuantity, FuelType, PerFuel},
    policy::Policy,
    ports::{self, Port, PortCandidate},
    prelude::*,
    price::{PriceBook, ResolvedPrice},
    quantity::{
        cost::{Usd, UsdPerTon},
        distance::NauticalMiles,
    },
    ranking,
    rob::{Action, BunkerEvent, Simulator},
    vessel::VesselProfile,
};

/// Outcome of the planning.
///
/// Infeasible voyages are not errors: they come with no plans and an explanation.
#[derive(Clone, Debug, Serialize)]
pub struct BunkerPlanning {
    pub requirement: Requirement,
    pub can_proceed_without_bunker: bool,

    /// Whether a single full tank is not enough, or the caller insisted on the search.
    pub required: bool,

    pub departure: Option<PortCandidate>,

    /// Ranked valid plans, best first.
    pub plans: Vec<MultiStopPlan>,

    pub rejected: Vec<RejectedCandidate>,
    pub error_message: Option<String>,
}

impl BunkerPlanning {
    #[must_use]
    pub fn best_plan(&self) -> Option<&MultiStopPlan> {
        self.plans.first()
    }

    /// Cost of the best plan, zero when no bunkering is needed.
    pub fn total_cost(&self) -> Usd {
        self.best_plan().map_or(Usd::ZERO, |plan| plan.total_cost)
    }
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Planner<'a> {
    vessel: &'a VesselProfile,

    /// Consumption along the route at the planned speed.
    consumption: &'a ConsumptionBreakdown,

    ports: &'a [Port],
    prices: &'a PriceBook,

    #[builder(default)]
    policy: Policy,

    /// Search for two-stop plans even when a single stop would do.
    #[builder(default)]
    force_required: bool,
}

impl<S: planner_builder::IsComplete> PlannerBuilder<'_, S> {
    pub fn plan(self) -> Result<BunkerPlanning, InputError> {
        self.build().plan()
    }
}

impl Planner<'_> {
    #[instrument(
        skip_all,
        fields(distance = %self.consumption.distance, force_required = self.force_required),
    )]
    fn plan(self) -> Result<BunkerPlanning, InputError> {
        self.vessel.validate()?;
        self.policy.validate()?;

        let requirement = Requirement::assess(
            self.vessel.initial_rob,
            self.vessel.capacity,
            self.consumption.total,
            self.consumption.average_daily(),
            self.policy.safety_margin,
        );
        let can_proceed_without_bunker = requirement.can_proceed_without_bunker();
        let required = self.force_required || requirement.is_multi_stop_required();
        info!(
            can_proceed_without_bunker,
            required,
            short_fuels = ?requirement.short_fuels(),
            "assessed the voyage",
        );

        let mut planning = BunkerPlanning {
            requirement,
            can_proceed_without_bunker,
            required,
            departure: None,
            plans: Vec::new(),
            rejected: Vec::new(),
            error_message: None,
        };
        if can_proceed_without_bunker && !self.force_required {
            return Ok(planning);
        }

        let selection =
            ports::select(self.ports, self.consumption.distance, self.prices, &self.policy)?;
        let Some(departure) = selection.departure else {
            planning.error_message =
                Some("no priced bunkering port found near the start of the route".to_string());
            return Ok(planning);
        };
        planning.departure = Some(departure.clone());
        let buffer = requirement.buffer();

        if !required {
            match self.build(&[(StopRole::Departure, &departure)], buffer)? {
                Ok(plan) => {
                    planning.plans = ranking::rank(vec![plan], self.policy.max_ranked_plans);
                    return Ok(planning);
                }
                Err(reason) => {
                    info!(%reason, "departure-only plan is not enough, trying two stops");
                    planning
                        .rejected
                        .push(RejectedCandidate { port_code: departure.port.code.clone(), reason });
                }
            }
        }

        if selection.mid_voyage.is_empty() {
            planning.error_message = Some(format!(
                "no priced port within {} of the route between {:.0}% and {:.0}% of the voyage",
                self.policy.max_deviation,
                self.policy.mid_voyage_min_progress * 100.0,
                self.policy.mid_voyage_max_progress * 100.0,
            ));
            return Ok(planning);
        }

        let mut plans = Vec::with_capacity(selection.mid_voyage.len());
        for candidate in &selection.mid_voyage {
            debug!(port = %candidate.port.code, progress = candidate.progress, "evaluating…");
            let outcome = if candidate.port.along_route <= departure.port.along_route {
                Err(Rejection::BeforeDeparture)
            } else {
                self.build(
                    &[(StopRole::Departure, &departure), (StopRole::MidVoyage, candidate)],
                    buffer,
                )?
            };
            match outcome {
                Ok(plan) => plans.push(plan),
                Err(reason) => planning
                    .rejected
                    .push(RejectedCandidate { port_code: candidate.port.code.clone(), reason }),
            }
        }

        info!(n_plans = plans.len(), n_rejected = planning.rejected.len(), "evaluated candidates");
        if plans.is_empty() {
            planning.error_message = Some(
                "no safe two-stop plan: the route likely needs 3 or more stops, contact operations"
                    .to_string(),
            );
        }
        planning.plans = ranking::rank(plans, self.policy.max_ranked_plans);
        Ok(planning)
    }

    /// Build a plan over the given stops and validate it by simulation.
    ///
    /// All stops but the last fill up the tanks. The last one takes what is needed to reach the
    /// destination with the buffer, as far as the tanks allow.
    fn build(
        &self,
        stops: &[(StopRole, &PortCandidate)],
        buffer: FuelQuantity,
    ) -> Result<Result<MultiStopPlan, Rejection>, InputError> {
        let route = stops.iter().map(|(_, candidate)| candidate.port.code.as_str()).join(" → ");
        let capacity = self.vessel.capacity;
        let mut rob = self.vessel.initial_rob;
        let mut position = NauticalMiles::ZERO;
        let mut bunkers = Vec::with_capacity(stops.len());
        let mut prices = Vec::with_capacity(stops.len());

        for (index, (role, candidate)) in stops.iter().enumerate() {
            let port = &candidate.port;
            let Some(port_prices) = self.prices.resolve_all(&port.code) else {
                return Ok(Err(Rejection::Unpriced));
            };
            prices.push(port_prices);

            rob -= self.consumption.between(position, port.along_route);
            position = port.along_route;
            let required_on_arrival =
                if *role == StopRole::Departure { FuelQuantity::ZERO } else { buffer };
            if !rob.below(required_on_arrival).is_empty() {
                warn!(%route, port = %port.code, %rob, "cannot safely reach");
                return Ok(Err(Rejection::Unreachable {
                    rob_on_arrival: rob,
                    buffer: required_on_arrival,
                }));
            }

            let free = (capacity - rob).non_negative();
            let quantity = if index + 1 == stops.len() {
                (self.consumption.remaining_after(position) + buffer - rob).non_negative().min(free)
            } else {
                free
            };
            rob += quantity;
            bunkers.push(quantity);
        }

        let cuts: Vec<_> = stops
            .iter()
            .map(|(_, candidate)| (candidate.port.along_route, candidate.port.code.as_str()))
            .collect();
        let (legs, points) = self.consumption.split_at(&cuts);
        let events: Vec<_> = stops
            .iter()
            .zip(points)
            .zip(&bunkers)
            .map(|(((_, candidate), at), quantity)| BunkerEvent {
                at,
                port: candidate.port.code.clone(),
                quantity: *quantity,
            })
            .collect();
        let trace = Simulator::builder()
            .initial_rob(self.vessel.initial_rob)
            .capacity(capacity)
            .legs(&legs)
            .bunkers(&events)
            .safety_margin(self.policy.safety_margin)
            .run()?;
        if !trace.is_safe {
            warn!(%route, n_violations = trace.violations.len(), "calculated but unsafe");
            return Ok(Err(Rejection::Unsafe { violations: trace.violations }));
        }

        let bunker_waypoints = trace
            .waypoints
            .iter()
            .filter(|waypoint| matches!(waypoint.action, Action::Bunker { .. }));
        let stops: Vec<_> = stops
            .iter()
            .zip(bunker_waypoints)
            .zip(&prices)
            .map(|(((role, candidate), waypoint), prices)| {
                let quantity = waypoint.rob_after - waypoint.rob_before;
                BunkerStop {
                    role: *role,
                    port_code: candidate.port.code.clone(),
                    port_name: candidate.port.name.clone(),
                    along_route: candidate.port.along_route,
                    progress: candidate.progress,
                    deviation: candidate.port.deviation,
                    quantity,
                    rob_before: waypoint.rob_before,
                    rob_after: waypoint.rob_after,
                    prices: *prices,
                    cost: quantity * prices.map(|_, price| price.price),
                }
            })
            .collect();

        let fuel_cost: Usd = stops.iter().map(|stop| stop.cost).sum();
        let combined_deviation: NauticalMiles = stops.iter().map(|stop| stop.deviation).sum();
        // There and back at the voyage speed:
        let deviation_fuel = self.consumption.profile.total()
            * ((combined_deviation * 2.0) / self.consumption.speed);
        let deviation_cost = deviation_fuel * Self::average_price(&prices);

        let plan = MultiStopPlan {
            fuel_cost,
            deviation_cost,
            total_cost: fuel_cost + deviation_cost,
            final_rob: trace.final_rob,
            is_safe: trace.is_safe,
            stops,
            trace,
            rank: None,
            savings: Usd::ZERO,
        };
        debug!(%route, total_cost = %plan.total_cost, "calculated");
        Ok(Ok(plan))
    }

    /// Plain average over the stops and the fuel types.
    #[allow(clippy::cast_precision_loss)]
    fn average_price(prices: &[PerFuel<ResolvedPrice>]) -> UsdPerTon {
        let all = prices
            .iter()
            .flat_map(|prices| FuelType::all().iter().map(move |fuel| prices.get(fuel).price))
            .collect_vec();
        if all.is_empty() {
            UsdPerTon::ZERO
        } else {
            all.iter().copied().sum::<UsdPerTon>() / all.len() as f64
        }
    }
}
