//! Bunkering port candidates along the route.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{
    error::InputError,
    policy::Policy,
    prelude::*,
    price::PriceBook,
    quantity::distance::NauticalMiles,
};

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Port as supplied by the route service.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Port {
    /// UN/LOCODE, also the key in the price book.
    pub code: String,

    pub name: String,

    #[serde(default)]
    pub coordinates: Option<Coordinates>,

    /// Distance from the origin to the point of the route closest to the port.
    pub along_route: NauticalMiles,

    /// Distance between the port and the route.
    #[serde(default)]
    pub deviation: NauticalMiles,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortCandidate {
    #[serde(flatten)]
    pub port: Port,

    /// Fraction of the route sailed when passing the port.
    pub progress: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Selection {
    pub departure: Option<PortCandidate>,

    /// Best candidates first.
    pub mid_voyage: Vec<PortCandidate>,
}

/// Pick the departure port and order the mid-voyage candidates.
///
/// Only ports with at least one resolvable price are considered.
#[instrument(skip_all, fields(n_ports = ports.len(), %total_distance))]
pub fn select(
    ports: &[Port],
    total_distance: NauticalMiles,
    prices: &PriceBook,
    policy: &Policy,
) -> Result<Selection, InputError> {
    if !total_distance.is_positive() {
        return Err(InputError::ZeroLengthRoute);
    }
    for port in ports {
        if !(port.along_route.is_non_negative() && port.along_route <= total_distance) {
            return Err(InputError::PortOffRoute {
                port: port.code.clone(),
                along_route: port.along_route,
                total: total_distance,
            });
        }
        if !port.deviation.is_non_negative() {
            return Err(InputError::InvalidDeviation {
                port: port.code.clone(),
                deviation: port.deviation,
            });
        }
    }

    let candidates = ports
        .iter()
        .filter(|port| {
            let is_priced = prices.is_priced(&port.code);
            if !is_priced {
                debug!(port = %port.code, "no price, skipping");
            }
            is_priced
        })
        .map(|port| PortCandidate {
            port: port.clone(),
            progress: port.along_route / total_distance,
        })
        .collect_vec();

    let closest_to_origin =
        |candidate: &&PortCandidate| (candidate.port.along_route, candidate.port.code.clone());
    let departure = candidates
        .iter()
        .filter(|candidate| candidate.progress <= policy.departure_window)
        .min_by_key(closest_to_origin)
        .or_else(|| {
            candidates
                .iter()
                .filter(|candidate| candidate.port.deviation <= policy.max_deviation)
                .min_by_key(closest_to_origin)
        })
        .cloned();

    let mid_voyage = candidates
        .into_iter()
        .filter(|candidate| {
            policy.is_mid_voyage(candidate.progress)
                && candidate.port.deviation <= policy.max_deviation
                && departure
                    .as_ref()
                    .is_none_or(|departure| departure.port.code != candidate.port.code)
        })
        .sorted_by_cached_key(|candidate| {
            (
                OrderedFloat((candidate.progress - policy.target_progress).abs()),
                candidate.port.deviation,
                candidate.port.code.clone(),
            )
        })
        .collect_vec();

    info!(
        departure = departure.as_ref().map(|departure| departure.port.code.as_str()),
        n_mid_voyage = mid_voyage.len(),
        "selected ports",
    );
    Ok(Selection { departure, mid_voyage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{price::PortPrices, quantity::cost::UsdPerTon};

    const TOTAL: NauticalMiles = NauticalMiles::new(10000.0);

    fn port(code: &str, along_route: f64, deviation: f64) -> Port {
        Port {
            code: code.to_string(),
            name: code.to_lowercase(),
            coordinates: None,
            along_route: NauticalMiles::new(along_route),
            deviation: NauticalMiles::new(deviation),
        }
    }

    fn priced(codes: &[&str]) -> PriceBook {
        codes
            .iter()
            .map(|code| (*code, PortPrices { vlsfo: Some(UsdPerTon::new(600.0)), lsmgo: None }))
            .collect()
    }

    fn codes(candidates: &[PortCandidate]) -> Vec<&str> {
        candidates.iter().map(|candidate| candidate.port.code.as_str()).collect()
    }

    #[test]
    fn departure_closest_to_origin() {
        let ports =
            [port("SECOND", 1500.0, 0.0), port("FIRST", 500.0, 50.0), port("FAR", 2500.0, 0.0)];
        let book = priced(&["SECOND", "FIRST", "FAR"]);
        let selection = select(&ports, TOTAL, &book, &Policy::default()).unwrap();
        assert_eq!(selection.departure.unwrap().port.code, "FIRST");
    }

    #[test]
    fn departure_skips_unpriced() {
        let ports = [port("FIRST", 0.0, 0.0), port("SECOND", 100.0, 0.0)];
        let selection = select(&ports, TOTAL, &priced(&["SECOND"]), &Policy::default()).unwrap();
        assert_eq!(selection.departure.unwrap().port.code, "SECOND");
    }

    #[test]
    fn departure_fallback() {
        let ports =
            [port("OFF", 3000.0, 150.0), port("NEAR", 4000.0, 20.0), port("MID", 5000.0, 0.0)];
        let book = priced(&["OFF", "NEAR", "MID"]);
        let selection = select(&ports, TOTAL, &book, &Policy::default()).unwrap();
        assert_eq!(selection.departure.unwrap().port.code, "NEAR");
        assert_eq!(codes(&selection.mid_voyage), ["MID"]);
    }

    #[test]
    fn mid_voyage_order() {
        let ports = [
            port("START", 0.0, 0.0),
            port("EARLY", 2900.0, 0.0),
            port("A", 4000.0, 10.0),
            port("B", 6000.0, 5.0),
            port("C", 5000.0, 80.0),
            port("D", 6000.0, 5.0),
            port("OFF", 5000.0, 101.0),
            port("LATE", 8000.0, 0.0),
        ];
        let book = priced(&["START", "EARLY", "A", "B", "C", "D", "OFF", "LATE"]);
        let selection = select(&ports, TOTAL, &book, &Policy::default()).unwrap();
        assert_eq!(selection.departure.unwrap().port.code, "START");
        assert_eq!(codes(&selection.mid_voyage), ["C", "B", "D", "A", "LATE"]);
    }

    #[test]
    fn nothing_priced() {
        let ports = [port("A", 0.0, 0.0)];
        let selection = select(&ports, TOTAL, &PriceBook::default(), &Policy::default()).unwrap();
        assert!(selection.departure.is_none());
        assert!(selection.mid_voyage.is_empty());
    }

    #[test]
    fn invalid_ports() {
        assert!(matches!(
            select(&[port("A", 10001.0, 0.0)], TOTAL, &PriceBook::default(), &Policy::default()),
            Err(InputError::PortOffRoute { .. }),
        ));
        assert!(matches!(
            select(&[port("A", 1.0, -1.0)], TOTAL, &PriceBook::default(), &Policy::default()),
            Err(InputError::InvalidDeviation { .. }),
        ));
        assert_eq!(
            select(&[], NauticalMiles::ZERO, &PriceBook::default(), &Policy::default())
                .unwrap_err(),
            InputError::ZeroLengthRoute,
        );
    }
}
