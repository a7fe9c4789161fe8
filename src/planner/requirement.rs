use enumset::EnumSet;
use serde::Serialize;

use crate::{
    fuel::{FuelQuantity, FuelRates, FuelType, PerFuel},
    quantity::{mass::MetricTons, time::Days},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct FuelRequirement {
    /// Burnt over the whole voyage.
    pub consumption: MetricTons,

    /// Must stay on board at any time: the daily consumption over the safety margin.
    pub buffer: MetricTons,

    /// Left at the destination when sailing without bunkering.
    pub without_bunker: MetricTons,

    /// Left at the destination after filling up the tank once.
    pub after_single_stop: MetricTons,
}

impl FuelRequirement {
    #[must_use]
    pub fn can_proceed_without_bunker(&self) -> bool {
        self.without_bunker >= self.buffer
    }

    /// Even a full tank does not last the voyage with the buffer.
    #[must_use]
    pub fn is_multi_stop_required(&self) -> bool {
        self.after_single_stop < self.buffer
    }
}

/// Whether the voyage needs bunkering, and how much of it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Requirement {
    pub fuels: PerFuel<FuelRequirement>,
    pub safety_margin: Days,
}

impl Requirement {
    /// Assess each fuel type independently.
    pub fn assess(
        initial_rob: FuelQuantity,
        capacity: FuelQuantity,
        consumption: FuelQuantity,
        daily: FuelRates,
        safety_margin: Days,
    ) -> Self {
        let fuels = consumption.map(|fuel, consumption| FuelRequirement {
            consumption,
            buffer: daily.get(fuel) * safety_margin,
            without_bunker: initial_rob.get(fuel) - consumption,
            after_single_stop: capacity.get(fuel) - consumption,
        });
        Self { fuels, safety_margin }
    }

    pub fn buffer(&self) -> FuelQuantity {
        self.fuels.map(|_, fuel| fuel.buffer)
    }

    #[must_use]
    pub fn can_proceed_without_bunker(&self) -> bool {
        self.fuels.iter().all(|(_, fuel)| fuel.can_proceed_without_bunker())
    }

    #[must_use]
    pub fn is_multi_stop_required(&self) -> bool {
        !self.short_fuels().is_empty()
    }

    /// Fuel types a single full tank is not enough for.
    pub fn short_fuels(&self) -> EnumSet<FuelType> {
        self.fuels
            .iter()
            .filter(|(_, fuel)| fuel.is_multi_stop_required())
            .map(|(fuel_type, _)| fuel_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::rate::TonsPerDay;

    fn tons(vlsfo: f64, lsmgo: f64) -> FuelQuantity {
        PerFuel::new(MetricTons::new(vlsfo), MetricTons::new(lsmgo))
    }

    const DAILY: FuelRates = PerFuel::new(TonsPerDay::new(30.0), TonsPerDay::new(3.0));

    #[test]
    fn short_of_lsmgo() {
        let requirement = Requirement::assess(
            tons(100.0, 20.0),
            tons(2000.0, 200.0),
            tons(1000.0, 195.0),
            DAILY,
            Days::new(3.0),
        );
        assert_abs_diff_eq!(requirement.fuels.lsmgo.after_single_stop.get(), 5.0);
        assert_abs_diff_eq!(requirement.fuels.lsmgo.buffer.get(), 9.0);
        assert!(requirement.is_multi_stop_required());
        assert_eq!(requirement.short_fuels(), EnumSet::only(FuelType::Lsmgo));
        assert!(!requirement.can_proceed_without_bunker());
    }

    #[test]
    fn enough_on_board() {
        let requirement = Requirement::assess(
            tons(1200.0, 150.0),
            tons(2000.0, 200.0),
            tons(1000.0, 100.0),
            DAILY,
            Days::new(3.0),
        );
        assert!(requirement.can_proceed_without_bunker());
        assert!(!requirement.is_multi_stop_required());
        assert_eq!(requirement.buffer(), tons(90.0, 9.0));
    }

    /// The buffer boundary itself is enough.
    #[test]
    fn boundary() {
        let requirement = Requirement::assess(
            tons(1090.0, 109.0),
            tons(1090.0, 109.0),
            tons(1000.0, 100.0),
            DAILY,
            Days::new(3.0),
        );
        assert!(requirement.can_proceed_without_bunker());
        assert!(!requirement.is_multi_stop_required());
    }

    #[test]
    fn assessment_is_pure() {
        let assess = || {
            Requirement::assess(
                tons(100.0, 20.0),
                tons(2000.0, 200.0),
                tons(1000.0, 195.0),
                DAILY,
                Days::new(3.0),
            )
        };
        assert_eq!(assess(), assess());
    }
}
