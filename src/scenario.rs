//! Voyage scenario file.

use std::{fs, path::Path};

use bunker_planner::{
    consumption::{Adjustments, ConsumptionBreakdown, compute_consumption},
    ports::Port,
    prelude::*,
    price::PriceBook,
    quantity::speed::Knots,
    rob::BunkerEvent,
    route::RouteSegment,
    vessel::VesselProfile,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,

    /// Service speed.
    pub speed: Knots,

    pub vessel: VesselProfile,

    #[serde(default)]
    pub adjustments: Adjustments,

    pub segments: Vec<RouteSegment>,

    /// Bunkering port candidates.
    #[serde(default)]
    pub ports: Vec<Port>,

    /// Fuel prices by port code.
    #[serde(default)]
    pub prices: PriceBook,

    /// Bunkering events for the simulation.
    #[serde(default)]
    pub bunkers: Vec<BunkerEvent>,
}

impl Scenario {
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let scenario: Self =
            toml::from_str(&text).with_context(|| format!("failed to parse `{}`", path.display()))?;
        info!(
            name = scenario.name.as_deref().unwrap_or("unnamed"),
            n_segments = scenario.segments.len(),
            n_ports = scenario.ports.len(),
            "loaded the scenario",
        );
        Ok(scenario)
    }

    pub fn consumption(&self, speed: Option<Knots>) -> Result<ConsumptionBreakdown> {
        compute_consumption(
            self.vessel.consumption,
            &self.segments,
            speed.unwrap_or(self.speed),
            self.adjustments,
        )
        .context("invalid voyage")
    }
}
