use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Cost in US dollars.
pub type Usd = Quantity<0, 0, 0, 1>;

/// Fuel price in US dollars per metric ton.
pub type UsdPerTon = Quantity<-1, 0, 0, 1>;

impl Display for Usd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.0}", self.get())
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}", self.get())
    }
}

impl Display for UsdPerTon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}/t", self.get())
    }
}

impl Debug for UsdPerTon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:?}/t", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Usd::new(80_000.4).to_string(), "$80000");
        assert_eq!(UsdPerTon::new(612.5).to_string(), "$612.50/t");
    }
}
