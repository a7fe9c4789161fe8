mod cli;
mod scenario;
mod tables;

use bunker_planner::{planner::Planner, prelude::*, rob::Simulator};
use clap::{Parser, crate_version};
use serde::Serialize;

use crate::{
    cli::{Args, Command, PlanArgs, ScenarioArgs, SimulateArgs},
    scenario::Scenario,
    tables::{
        build_consumption_table,
        build_plans_table,
        build_rejected_table,
        build_requirement_table,
        build_stops_table,
        build_trace_table,
        build_violations_table,
        describe,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let Args { json, command } = Args::parse();
    match command {
        Command::Consumption(args) => consumption(&args, json),
        Command::Simulate(args) => simulate(&args, json),
        Command::Plan(args) => plan(&args, json),
    }
}

fn consumption(args: &ScenarioArgs, json: bool) -> Result {
    let scenario = Scenario::read_from(&args.path)?;
    let breakdown = scenario.consumption(args.speed)?;
    for issue in breakdown.validate() {
        warn!(%issue, "inconsistent breakdown");
    }
    if json {
        print_json(&breakdown)
    } else {
        println!("{}", build_consumption_table(&breakdown));
        Ok(())
    }
}

fn simulate(args: &SimulateArgs, json: bool) -> Result {
    let scenario = Scenario::read_from(&args.scenario.path)?;
    let breakdown = scenario.consumption(args.scenario.speed)?;
    let trace = Simulator::builder()
        .initial_rob(scenario.vessel.initial_rob)
        .capacity(scenario.vessel.capacity)
        .legs(&breakdown.legs())
        .bunkers(&scenario.bunkers)
        .safety_margin(args.safety.safety_margin)
        .run()
        .context("failed to simulate the voyage")?;
    if let Some(lowest) = &trace.lowest {
        info!(location = %lowest.location, rob = %lowest.rob, "lowest point");
    }
    info!(
        is_safe = trace.is_safe,
        n_violations = trace.violations.len(),
        bunkered = %trace.total_bunkered(),
        consumed = %trace.total_consumed(),
        final_rob = %trace.final_rob,
        min_margin = %trace.min_margin(),
        "simulated",
    );
    if json {
        return print_json(&trace);
    }
    println!("{}", build_trace_table(&trace));
    if !trace.violations.is_empty() {
        println!("{}", build_violations_table(&trace));
    }
    Ok(())
}

fn plan(args: &PlanArgs, json: bool) -> Result {
    let scenario = Scenario::read_from(&args.scenario.path)?;
    let breakdown = scenario.consumption(args.scenario.speed)?;
    let planning = Planner::builder()
        .vessel(&scenario.vessel)
        .consumption(&breakdown)
        .ports(&scenario.ports)
        .prices(&scenario.prices)
        .policy(args.policy())
        .force_required(args.force)
        .plan()
        .context("failed to plan bunkering")?;
    if json {
        return print_json(&planning);
    }
    println!("{}", build_requirement_table(&planning.requirement));
    if !planning.plans.is_empty() {
        println!("{}", build_plans_table(&planning.plans));
    }
    if let Some(best) = planning.best_plan() {
        println!("{}", build_stops_table(best));
    }
    if !planning.rejected.is_empty() {
        println!("{}", build_rejected_table(&planning.rejected));
    }
    println!("{}", describe(&planning));
    Ok(())
}

fn print_json(value: &impl Serialize) -> Result {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
