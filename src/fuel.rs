use std::{
    fmt::{Display, Formatter},
    iter::Sum,
    ops::{Add, Mul},
};

use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::quantity::{
    Quantity,
    cost::{Usd, UsdPerTon},
    mass::MetricTons,
    rate::TonsPerDay,
    time::Days,
};

#[derive(Debug, Deserialize, Serialize, enumset::EnumSetType)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    /// Very-low-sulphur fuel oil, burnt by the main engine outside emission control areas.
    Vlsfo,

    /// Low-sulphur marine gas oil: auxiliary engines, and the main engine inside ECAs.
    Lsmgo,
}

impl FuelType {
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }
}

impl Display for FuelType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vlsfo => write!(f, "VLSFO"),
            Self::Lsmgo => write!(f, "LSMGO"),
        }
    }
}

/// One value per fuel type.
#[must_use]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Deserialize,
    Eq,
    PartialEq,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::SubAssign,
)]
pub struct PerFuel<T> {
    pub vlsfo: T,
    pub lsmgo: T,
}

pub type FuelQuantity = PerFuel<MetricTons>;

pub type FuelRates = PerFuel<TonsPerDay>;

impl<T: Copy> PerFuel<T> {
    pub const fn new(vlsfo: T, lsmgo: T) -> Self {
        Self { vlsfo, lsmgo }
    }

    pub const fn get(&self, fuel: FuelType) -> T {
        match fuel {
            FuelType::Vlsfo => self.vlsfo,
            FuelType::Lsmgo => self.lsmgo,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(FuelType, T) -> U) -> PerFuel<U> {
        PerFuel { vlsfo: f(FuelType::Vlsfo, self.vlsfo), lsmgo: f(FuelType::Lsmgo, self.lsmgo) }
    }

    pub fn zip_with<U: Copy, V>(
        self,
        other: PerFuel<U>,
        mut f: impl FnMut(T, U) -> V,
    ) -> PerFuel<V> {
        PerFuel { vlsfo: f(self.vlsfo, other.vlsfo), lsmgo: f(self.lsmgo, other.lsmgo) }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FuelType, T)> + '_ {
        FuelType::all().iter().map(|fuel| (fuel, self.get(fuel)))
    }
}

impl<T: Copy + Ord> PerFuel<T> {
    pub fn min(self, other: Self) -> Self {
        self.zip_with(other, Ord::min)
    }

    pub fn max(self, other: Self) -> Self {
        self.zip_with(other, Ord::max)
    }
}

impl<T: Copy + Mul<f64, Output = T>> Mul<f64> for PerFuel<T> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.map(|_, value| value * rhs)
    }
}

impl<T: Default + Add<Output = T>> Sum for PerFuel<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<const MASS: isize, const DISTANCE: isize, const TIME: isize, const COST: isize>
    PerFuel<Quantity<MASS, DISTANCE, TIME, COST>>
{
    pub const ZERO: Self = Self::new(Quantity::ZERO, Quantity::ZERO);

    /// Sum over both fuel types, only meaningful for quantities of the same kind.
    pub fn total(self) -> Quantity<MASS, DISTANCE, TIME, COST> {
        self.vlsfo + self.lsmgo
    }

    /// Replace negative values with zeroes.
    pub fn non_negative(self) -> Self {
        self.map(|_, value| value.max(Quantity::ZERO))
    }

    /// Fuel types whose value is strictly below the threshold.
    pub fn below(self, threshold: Self) -> EnumSet<FuelType> {
        self.iter()
            .filter(|(fuel, value)| *value < threshold.get(*fuel))
            .map(|(fuel, _)| fuel)
            .collect()
    }
}

impl Mul<Days> for FuelRates {
    type Output = FuelQuantity;

    fn mul(self, rhs: Days) -> Self::Output {
        self.map(|_, rate| rate * rhs)
    }
}

impl Mul<PerFuel<UsdPerTon>> for FuelQuantity {
    type Output = Usd;

    fn mul(self, rhs: PerFuel<UsdPerTon>) -> Self::Output {
        self.zip_with(rhs, |quantity, price| quantity * price).total()
    }
}

impl FuelQuantity {
    /// Sailing days until the first fuel type runs out at the given consumption.
    ///
    /// A fuel type that is not consumed at all never runs out.
    pub fn endurance(self, rates: FuelRates) -> Days {
        self.iter()
            .map(|(fuel, rob)| {
                let rate = rates.get(fuel);
                if rate > TonsPerDay::ZERO { rob / rate } else { Days::INFINITY }
            })
            .min()
            .unwrap_or(Days::INFINITY)
    }
}

impl Display for FuelQuantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} VLSFO / {} LSMGO", self.vlsfo, self.lsmgo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tons(vlsfo: f64, lsmgo: f64) -> FuelQuantity {
        PerFuel::new(MetricTons::new(vlsfo), MetricTons::new(lsmgo))
    }

    fn rates(vlsfo: f64, lsmgo: f64) -> FuelRates {
        PerFuel::new(TonsPerDay::new(vlsfo), TonsPerDay::new(lsmgo))
    }

    /// Both fuel types last exactly three days: the margin sits on the boundary.
    #[test]
    fn endurance_boundary() {
        assert_eq!(tons(90.0, 9.0).endurance(rates(30.0, 3.0)), Days::new(3.0));
    }

    #[test]
    fn endurance_takes_the_scarcer_fuel() {
        assert_eq!(tons(300.0, 6.0).endurance(rates(30.0, 3.0)), Days::new(2.0));
    }

    #[test]
    fn endurance_without_consumption() {
        assert_eq!(tons(90.0, 9.0).endurance(rates(0.0, 3.0)), Days::new(3.0));
        assert_eq!(tons(90.0, 9.0).endurance(FuelRates::ZERO), Days::INFINITY);
    }

    #[test]
    fn below() {
        let short = tons(10.0, 5.0).below(tons(5.0, 9.0));
        assert!(short.contains(FuelType::Lsmgo));
        assert!(!short.contains(FuelType::Vlsfo));
    }

    #[test]
    fn sum() {
        let total: FuelQuantity = [tons(1.0, 2.0), tons(3.0, 4.0)].into_iter().sum();
        assert_eq!(total, tons(4.0, 6.0));
    }

    #[test]
    fn cost() {
        let prices = PerFuel::new(UsdPerTon::new(600.0), UsdPerTon::new(840.0));
        assert_eq!(tons(10.0, 1.0) * prices, Usd::new(6840.0));
    }
}
