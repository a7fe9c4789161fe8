use std::ops::{Div, Mul};

use crate::quantity::{
    Quantity,
    cost::{Usd, UsdPerTon},
    rate::TonsPerDay,
    time::Days,
};

/// Fuel mass in metric tons.
pub type MetricTons = Quantity<1, 0, 0, 0>;

unit!(MetricTons, "t", precision: 1);

impl Div<TonsPerDay> for MetricTons {
    type Output = Days;

    fn div(self, rhs: TonsPerDay) -> Self::Output {
        Days::new(self.get() / rhs.get())
    }
}

impl Mul<UsdPerTon> for MetricTons {
    type Output = Usd;

    fn mul(self, rhs: UsdPerTon) -> Self::Output {
        Usd::new(self.get() * rhs.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endurance() {
        assert_eq!(MetricTons::new(90.0) / TonsPerDay::new(30.0), Days::new(3.0));
    }

    #[test]
    fn test_cost() {
        assert_eq!(MetricTons::new(10.0) * UsdPerTon::new(600.0), Usd::new(6000.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(MetricTons::new(12.345).to_string(), "12.3 t");
        assert_eq!(format!("{:?}", MetricTons::new(1.5)), "1.5t");
    }
}
