use crate::{
    fuel::FuelType,
    quantity::{
        distance::NauticalMiles,
        mass::MetricTons,
        rate::TonsPerDay,
        speed::Knots,
        time::Days,
    },
};

/// Malformed input: nothing gets computed.
///
/// Infeasible voyages and safety violations are not errors, they are reported in the results.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("the route has no segments")]
    EmptyRoute,

    #[error("the route has zero total distance")]
    ZeroLengthRoute,

    #[error("speed must be positive, got {0}")]
    NonPositiveSpeed(Knots),

    #[error("segment `{segment}` has an invalid distance: {distance}")]
    InvalidDistance { segment: String, distance: NauticalMiles },

    #[error("leg `{leg}` has an invalid duration: {duration}")]
    InvalidDuration { leg: String, duration: Days },

    #[error("{engine} consumption must be non-negative, got {rate}")]
    InvalidRate { engine: &'static str, rate: TonsPerDay },

    #[error("{factor} adjustment factor must be positive, got {value}")]
    InvalidAdjustment { factor: &'static str, value: f64 },

    #[error("{fuel} tank capacity must be positive, got {capacity}")]
    NonPositiveCapacity { fuel: FuelType, capacity: MetricTons },

    #[error("{fuel} remaining on board must be non-negative, got {rob}")]
    NegativeRob { fuel: FuelType, rob: MetricTons },

    #[error("{fuel} remaining on board {rob} exceeds the tank capacity {capacity}")]
    RobExceedsCapacity { fuel: FuelType, rob: MetricTons, capacity: MetricTons },

    #[error("bunkering at `{port}` requests an invalid {fuel} quantity: {quantity}")]
    InvalidBunkerQuantity { port: String, fuel: FuelType, quantity: MetricTons },

    #[error("bunkering at `{port}` follows leg #{index}, but there are only {n_legs} legs")]
    BunkerOutOfRange { port: String, index: usize, n_legs: usize },

    #[error("safety margin must be non-negative, got {0}")]
    InvalidSafetyMargin(Days),

    #[error("{name} must be a route fraction within 0 and 1, got {value}")]
    InvalidProgress { name: &'static str, value: f64 },

    #[error("the mid-voyage window {min}..{max} is empty")]
    EmptyMidVoyageWindow { min: f64, max: f64 },

    #[error("maximal deviation must be non-negative, got {0}")]
    InvalidMaxDeviation(NauticalMiles),

    #[error("at least one ranked plan must be kept")]
    NoRankedPlans,

    #[error("port `{port}` lies {along_route} along a {total} route")]
    PortOffRoute { port: String, along_route: NauticalMiles, total: NauticalMiles },

    #[error("port `{port}` has an invalid deviation: {deviation}")]
    InvalidDeviation { port: String, deviation: NauticalMiles },
}
