use std::path::PathBuf;

use bunker_planner::{
    policy::{MAX_RANKED_PLANS, Policy},
    quantity::{distance::NauticalMiles, speed::Knots, time::Days},
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Print the results as JSON instead of tables.
    #[clap(long, global = true, env = "JSON_OUTPUT")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Per-segment fuel consumption with the switch at the emission control area boundaries.
    #[clap(name = "consumption")]
    Consumption(ScenarioArgs),

    /// Remaining-on-board trace over the bunkering events of the scenario.
    #[clap(name = "simulate")]
    Simulate(Box<SimulateArgs>),

    /// Assess the voyage and rank the bunkering plans.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),
}

#[derive(Parser)]
pub struct ScenarioArgs {
    /// Voyage scenario file.
    #[clap(long = "scenario", env = "SCENARIO_PATH")]
    pub path: PathBuf,

    /// Service speed in knots, overrides the one from the scenario.
    #[clap(long = "speed-knots", env = "SPEED_KNOTS")]
    pub speed: Option<Knots>,
}

#[derive(Parser)]
pub struct SafetyArgs {
    /// Sailing days that must remain on board for each fuel type.
    #[clap(long = "safety-margin-days", default_value = "3", env = "SAFETY_MARGIN_DAYS")]
    pub safety_margin: Days,
}

#[derive(Parser)]
pub struct SimulateArgs {
    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    #[clap(flatten)]
    pub safety: SafetyArgs,
}

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub scenario: ScenarioArgs,

    #[clap(flatten)]
    pub safety: SafetyArgs,

    /// Maximal distance between a bunkering port and the route, in nautical miles.
    #[clap(long = "max-deviation-nm", default_value = "100", env = "MAX_DEVIATION_NM")]
    pub max_deviation: NauticalMiles,

    #[clap(long, default_value_t = MAX_RANKED_PLANS, env = "MAX_RANKED_PLANS")]
    pub max_ranked_plans: usize,

    /// Search for two-stop plans even when a single stop would do.
    #[clap(long)]
    pub force: bool,
}

impl PlanArgs {
    pub fn policy(&self) -> Policy {
        Policy::builder()
            .safety_margin(self.safety.safety_margin)
            .max_deviation(self.max_deviation)
            .max_ranked_plans(self.max_ranked_plans)
            .build()
    }
}
