use std::ops::Div;

use crate::quantity::{Quantity, speed::Knots, time::Days};

pub type NauticalMiles = Quantity<0, 1, 0, 0>;

unit!(NauticalMiles, "nm", precision: 0);

impl Div<Knots> for NauticalMiles {
    type Output = Days;

    /// Sailing time at the given speed.
    fn div(self, rhs: Knots) -> Self::Output {
        Days::new(self.get() / (rhs.get() * Days::HOURS_PER_DAY))
    }
}
