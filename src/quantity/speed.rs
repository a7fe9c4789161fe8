use crate::quantity::Quantity;

/// Speed over ground in nautical miles per hour.
pub type Knots = Quantity<0, 1, -1, 0>;

unit!(Knots, "kn", precision: 1);
