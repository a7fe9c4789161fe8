//! Ordering of the valid plans.

use itertools::Itertools;

use crate::{planner::MultiStopPlan, prelude::*, quantity::cost::Usd};

/// Sort the plans by cost, assign ranks and savings, and keep the best `limit` ones.
///
/// Ties go to the smaller combined deviation, then to the port code.
/// Savings are measured against the most expensive plan, including those cut off by the limit.
#[instrument(skip_all, fields(n_plans = plans.len(), limit))]
pub fn rank(plans: Vec<MultiStopPlan>, limit: usize) -> Vec<MultiStopPlan> {
    let worst_cost = plans.iter().map(|plan| plan.total_cost).max().unwrap_or(Usd::ZERO);
    let ranked = plans
        .into_iter()
        .sorted_by_cached_key(|plan| {
            (plan.total_cost, plan.combined_deviation(), plan.last_port_code().map(str::to_owned))
        })
        .take(limit)
        .enumerate()
        .map(|(index, mut plan)| {
            plan.rank = Some(index + 1);
            plan.savings = worst_cost - plan.total_cost;
            plan
        })
        .collect_vec();
    if let Some(best) = ranked.first() {
        info!(
            route = %best.route_label(),
            total_cost = %best.total_cost,
            savings = %best.savings,
            "best plan",
        );
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fuel::{FuelQuantity, PerFuel},
        planner::{BunkerStop, StopRole},
        price::{PriceSource, ResolvedPrice},
        quantity::{cost::UsdPerTon, distance::NauticalMiles},
        rob::RobTrace,
    };

    fn plan(port_code: &str, total_cost: f64, deviation: f64) -> MultiStopPlan {
        let price = ResolvedPrice { price: UsdPerTon::new(600.0), source: PriceSource::Quoted };
        MultiStopPlan {
            stops: vec![BunkerStop {
                role: StopRole::MidVoyage,
                port_code: port_code.to_string(),
                port_name: port_code.to_string(),
                along_route: NauticalMiles::new(5000.0),
                progress: 0.5,
                deviation: NauticalMiles::new(deviation),
                quantity: FuelQuantity::ZERO,
                rob_before: FuelQuantity::ZERO,
                rob_after: FuelQuantity::ZERO,
                prices: PerFuel::new(price, price),
                cost: Usd::new(total_cost),
            }],
            fuel_cost: Usd::new(total_cost),
            deviation_cost: Usd::ZERO,
            total_cost: Usd::new(total_cost),
            final_rob: FuelQuantity::ZERO,
            is_safe: true,
            trace: RobTrace::default(),
            rank: None,
            savings: Usd::ZERO,
        }
    }

    fn summary(plans: &[MultiStopPlan]) -> Vec<(&str, Option<usize>, Usd)> {
        plans
            .iter()
            .map(|plan| (plan.last_port_code().unwrap_or_default(), plan.rank, plan.savings))
            .collect()
    }

    #[test]
    fn by_cost() {
        let plans = vec![
            plan("A", 150_000.0, 0.0),
            plan("B", 80_000.0, 0.0),
            plan("C", 120_000.0, 0.0),
        ];
        assert_eq!(
            summary(&rank(plans, 3)),
            [
                ("B", Some(1), Usd::new(70_000.0)),
                ("C", Some(2), Usd::new(30_000.0)),
                ("A", Some(3), Usd::ZERO),
            ],
        );
    }

    #[test]
    fn ties() {
        let plans =
            vec![plan("C", 100.0, 10.0), plan("B", 100.0, 5.0), plan("A", 100.0, 10.0)];
        assert_eq!(
            summary(&rank(plans, 3)).into_iter().map(|(code, _, _)| code).collect_vec(),
            ["B", "A", "C"],
        );
    }

    /// The cut-off plans still define the savings.
    #[test]
    fn limit() {
        let plans = vec![
            plan("A", 400.0, 0.0),
            plan("B", 100.0, 0.0),
            plan("C", 200.0, 0.0),
            plan("D", 300.0, 0.0),
        ];
        let ranked = rank(plans, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].savings, Usd::new(300.0));
        assert_eq!(ranked[2].last_port_code(), Some("D"));
    }

    #[test]
    fn empty() {
        assert!(rank(Vec::new(), 3).is_empty());
    }
}
