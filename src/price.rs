//! Port fuel prices with the cross-fuel fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    fuel::{FuelType, PerFuel},
    policy::LSMGO_PRICE_RATIO,
    quantity::cost::UsdPerTon,
};

/// Quotes of a single port, either may be missing.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PortPrices {
    #[serde(default)]
    pub vlsfo: Option<UsdPerTon>,

    #[serde(default)]
    pub lsmgo: Option<UsdPerTon>,
}

impl PortPrices {
    pub const fn quoted(&self, fuel: FuelType) -> Option<UsdPerTon> {
        match fuel {
            FuelType::Vlsfo => self.vlsfo,
            FuelType::Lsmgo => self.lsmgo,
        }
    }

    /// Usable quote: positive and finite.
    fn usable(&self, fuel: FuelType) -> Option<UsdPerTon> {
        self.quoted(fuel).filter(|price| price.is_positive())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSource {
    Quoted,

    /// Derived from the quote of the other fuel type.
    Derived { from: FuelType },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedPrice {
    pub price: UsdPerTon,
    pub source: PriceSource,
}

/// Prices by port code.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PriceBook(pub BTreeMap<String, PortPrices>);

impl PriceBook {
    /// Whether at least one fuel price can be resolved at the port.
    #[must_use]
    pub fn is_priced(&self, port_code: &str) -> bool {
        FuelType::all().iter().any(|fuel| self.resolve(port_code, fuel).is_some())
    }

    /// Resolve the price of the fuel at the port.
    ///
    /// A missing quote is derived from the other fuel type with the fixed LSMGO to VLSFO ratio.
    pub fn resolve(&self, port_code: &str, fuel: FuelType) -> Option<ResolvedPrice> {
        let prices = self.0.get(port_code)?;
        if let Some(price) = prices.usable(fuel) {
            return Some(ResolvedPrice { price, source: PriceSource::Quoted });
        }
        let (from, price) = match fuel {
            FuelType::Vlsfo => {
                (FuelType::Lsmgo, prices.usable(FuelType::Lsmgo)? / LSMGO_PRICE_RATIO)
            }
            FuelType::Lsmgo => {
                (FuelType::Vlsfo, prices.usable(FuelType::Vlsfo)? * LSMGO_PRICE_RATIO)
            }
        };
        Some(ResolvedPrice { price, source: PriceSource::Derived { from } })
    }

    /// Both fuel prices at the port, or nothing if neither is quoted.
    pub fn resolve_all(&self, port_code: &str) -> Option<PerFuel<ResolvedPrice>> {
        Some(PerFuel::new(
            self.resolve(port_code, FuelType::Vlsfo)?,
            self.resolve(port_code, FuelType::Lsmgo)?,
        ))
    }
}

impl<S: Into<String>> FromIterator<(S, PortPrices)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (S, PortPrices)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(code, prices)| (code.into(), prices)).collect())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn quote(vlsfo: Option<f64>, lsmgo: Option<f64>) -> PortPrices {
        PortPrices { vlsfo: vlsfo.map(UsdPerTon::new), lsmgo: lsmgo.map(UsdPerTon::new) }
    }

    fn book() -> PriceBook {
        [
            ("BOTH", quote(Some(600.0), Some(900.0))),
            ("VLSFO", quote(Some(600.0), None)),
            ("LSMGO", quote(None, Some(840.0))),
            ("NONE", PortPrices::default()),
            ("ZERO", quote(Some(0.0), None)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn quoted() {
        let price = book().resolve("BOTH", FuelType::Lsmgo).unwrap();
        assert_eq!(price.price, UsdPerTon::new(900.0));
        assert_eq!(price.source, PriceSource::Quoted);
    }

    #[test]
    fn lsmgo_from_vlsfo() {
        let price = book().resolve("VLSFO", FuelType::Lsmgo).unwrap();
        assert_abs_diff_eq!(price.price.get(), 840.0, epsilon = 1e-9);
        assert_eq!(price.source, PriceSource::Derived { from: FuelType::Vlsfo });
    }

    #[test]
    fn vlsfo_from_lsmgo() {
        let price = book().resolve("LSMGO", FuelType::Vlsfo).unwrap();
        assert_abs_diff_eq!(price.price.get(), 600.0, epsilon = 1e-9);
        assert_eq!(price.source, PriceSource::Derived { from: FuelType::Lsmgo });
    }

    #[test]
    fn unpriced() {
        let book = book();
        assert_eq!(book.resolve("NONE", FuelType::Vlsfo), None);
        assert_eq!(book.resolve("UNKNOWN", FuelType::Vlsfo), None);
        assert!(!book.is_priced("NONE"));
        assert!(!book.is_priced("ZERO"));
        assert!(book.is_priced("LSMGO"));
        assert!(book.resolve_all("ZERO").is_none());
    }
}
