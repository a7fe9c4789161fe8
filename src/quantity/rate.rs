use std::ops::Mul;

use crate::quantity::{Quantity, mass::MetricTons, time::Days};

/// Fuel consumption rate in metric tons per day.
pub type TonsPerDay = Quantity<1, 0, -1, 0>;

unit!(TonsPerDay, "t/d", precision: 2);

impl Mul<Days> for TonsPerDay {
    type Output = MetricTons;

    fn mul(self, rhs: Days) -> Self::Output {
        MetricTons::new(self.get() * rhs.get())
    }
}
