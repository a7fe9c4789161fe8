use crate::quantity::Quantity;

/// Sailing time in days.
pub type Days = Quantity<0, 0, 1, 0>;

unit!(Days, "d", precision: 2);

impl Days {
    pub const HOURS_PER_DAY: f64 = 24.0;
}
