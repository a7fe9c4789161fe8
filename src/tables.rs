use bunker_planner::{
    consumption::ConsumptionBreakdown,
    fuel::FuelType,
    planner::{BunkerPlanning, MultiStopPlan, RejectedCandidate, Requirement},
    price::PriceSource,
    quantity::mass::MetricTons,
    rob::{Action, RobTrace},
};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn right(content: impl ToString) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

const fn safety_color(is_safe: bool) -> Color {
    if is_safe { Color::Green } else { Color::Red }
}

pub fn build_consumption_table(breakdown: &ConsumptionBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Segment", "From", "To", "Start", "Distance", "Days", "Zone", "Main", "VLSFO", "LSMGO",
    ]);
    for segment in &breakdown.segments {
        table.add_row(vec![
            Cell::new(&segment.segment_id).add_attribute(Attribute::Dim),
            Cell::new(&segment.from),
            Cell::new(&segment.to),
            right(segment.start).add_attribute(Attribute::Dim),
            right(segment.distance),
            right(segment.duration),
            if segment.is_eca {
                Cell::new(segment.eca_zone.as_deref().unwrap_or("ECA")).fg(Color::DarkYellow)
            } else {
                Cell::new("open sea").add_attribute(Attribute::Dim)
            },
            Cell::new(segment.main_engine_fuel).fg(match segment.main_engine_fuel {
                FuelType::Vlsfo => Color::Blue,
                FuelType::Lsmgo => Color::DarkYellow,
            }),
            right(segment.total.vlsfo),
            right(segment.total.lsmgo),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        right(breakdown.distance).add_attribute(Attribute::Bold),
        right(breakdown.duration).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.0}% ECA", breakdown.eca_fraction() * 100.0)),
        Cell::new(""),
        right(breakdown.total.vlsfo).add_attribute(Attribute::Bold),
        right(breakdown.total.lsmgo).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_requirement_table(requirement: &Requirement) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Fuel", "Consumption", "Buffer", "Without bunker", "After one stop"]);
    for (fuel, fuel_requirement) in requirement.fuels.iter() {
        table.add_row(vec![
            Cell::new(fuel),
            right(fuel_requirement.consumption),
            right(fuel_requirement.buffer).add_attribute(Attribute::Dim),
            right(fuel_requirement.without_bunker)
                .fg(safety_color(fuel_requirement.can_proceed_without_bunker())),
            right(fuel_requirement.after_single_stop)
                .fg(safety_color(!fuel_requirement.is_multi_stop_required())),
        ]);
    }
    table
}

pub fn build_trace_table(trace: &RobTrace) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#", "Location", "Sailed", "Action", "VLSFO", "LSMGO", "After VLSFO", "After LSMGO",
        "Margin",
    ]);
    for (index, waypoint) in trace.waypoints.iter().enumerate() {
        let (action, color, quantity) = match waypoint.action {
            Action::None => ("", Color::Reset, None),
            Action::Consume { quantity } => ("consume", Color::Reset, Some(quantity)),
            Action::Bunker { received, .. } => ("bunker", Color::Cyan, Some(received)),
        };
        table.add_row(vec![
            right(index).add_attribute(Attribute::Dim),
            Cell::new(&waypoint.location),
            right(waypoint.distance).add_attribute(Attribute::Dim),
            Cell::new(action).fg(color),
            right(quantity.map(|quantity| quantity.vlsfo.to_string()).unwrap_or_default()),
            right(quantity.map(|quantity| quantity.lsmgo.to_string()).unwrap_or_default()),
            right(waypoint.rob_after.vlsfo).fg(rob_color(waypoint.rob_after.vlsfo)),
            right(waypoint.rob_after.lsmgo).fg(rob_color(waypoint.rob_after.lsmgo)),
            right(waypoint.safety_margin).fg(safety_color(waypoint.is_safe)),
        ]);
    }
    table
}

fn rob_color(rob: MetricTons) -> Color {
    if rob < MetricTons::ZERO { Color::Red } else { Color::Reset }
}

pub fn build_violations_table(trace: &RobTrace) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "Violation"]);
    for violation in &trace.violations {
        table.add_row(vec![
            right(violation.waypoint()).add_attribute(Attribute::Dim),
            Cell::new(violation).fg(if violation.is_critical() {
                Color::Red
            } else {
                Color::DarkYellow
            }),
        ]);
    }
    table
}

pub fn build_plans_table(plans: &[MultiStopPlan]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Rank", "Route", "VLSFO", "LSMGO", "Fuel", "Deviation", "Total", "Savings", "Final ROB",
    ]);
    for plan in plans {
        let bunkered = plan.total_bunkered();
        table.add_row(vec![
            right(plan.rank.map(|rank| rank.to_string()).unwrap_or_default()),
            Cell::new(plan.route_label()).fg(safety_color(plan.is_safe)),
            right(bunkered.vlsfo),
            right(bunkered.lsmgo),
            right(plan.fuel_cost),
            right(plan.deviation_cost).add_attribute(Attribute::Dim),
            right(plan.total_cost).add_attribute(Attribute::Bold),
            right(plan.savings).fg(Color::Green),
            Cell::new(plan.final_rob).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_stops_table(plan: &MultiStopPlan) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Role", "Port", "Along", "Deviation", "VLSFO", "LSMGO", "VLSFO price", "LSMGO price",
        "Cost",
    ]);
    for stop in &plan.stops {
        let price_cell = |fuel: FuelType| {
            let price = stop.prices.get(fuel);
            match price.source {
                PriceSource::Quoted => right(price.price),
                PriceSource::Derived { .. } => {
                    right(format!("~{}", price.price)).add_attribute(Attribute::Italic)
                }
            }
        };
        table.add_row(vec![
            Cell::new(stop.role).add_attribute(Attribute::Dim),
            Cell::new(format!("{} {}", stop.port_code, stop.port_name)),
            right(format!("{} ({:.0}%)", stop.along_route, stop.progress * 100.0)),
            right(stop.deviation),
            right(stop.quantity.vlsfo),
            right(stop.quantity.lsmgo),
            price_cell(FuelType::Vlsfo),
            price_cell(FuelType::Lsmgo),
            right(stop.cost),
        ]);
    }
    table
}

pub fn build_rejected_table(rejected: &[RejectedCandidate]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Port", "Reason"]);
    for candidate in rejected {
        table.add_row(vec![
            Cell::new(&candidate.port_code),
            Cell::new(&candidate.reason).fg(Color::DarkYellow),
        ]);
    }
    table
}

/// Summary line of the planning outcome.
pub fn describe(planning: &BunkerPlanning) -> String {
    if planning.can_proceed_without_bunker && planning.plans.is_empty() {
        "the voyage can proceed without bunkering".to_string()
    } else if let Some(best) = planning.best_plan() {
        format!("best plan: {} for {}", best.route_label(), best.total_cost)
    } else {
        planning.error_message.clone().unwrap_or_else(|| "no plan".to_string())
    }
}
