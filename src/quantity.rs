#[macro_use]
mod macros;

pub mod cost;
pub mod distance;
pub mod mass;
pub mod rate;
pub mod speed;
pub mod time;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Dimension-tagged physical value.
///
/// The exponents are tracked in the type, so that a distance cannot be added to a mass.
/// Cross-dimension products and ratios are implemented explicitly next to the type aliases.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[serde(transparent)]
#[must_use]
pub struct Quantity<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize>(
    pub OrderedFloat<f64>,
);

impl<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize>
    Quantity<MASS, DISTANCE, TIME, COST>
{
    pub const ZERO: Self = Self(OrderedFloat(0.0));
    pub const INFINITY: Self = Self(OrderedFloat(f64::INFINITY));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }

    /// Finite and not below zero.
    #[must_use]
    pub fn is_non_negative(self) -> bool {
        self.is_finite() && self >= Self::ZERO
    }

    /// Finite and strictly above zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.is_finite() && self > Self::ZERO
    }
}

impl<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize> Mul<f64>
    for Quantity<MASS, DISTANCE, TIME, COST>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize> Div<f64>
    for Quantity<MASS, DISTANCE, TIME, COST>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize> Div<Self>
    for Quantity<MASS, DISTANCE, TIME, COST>
{
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0.0 / rhs.0.0
    }
}
