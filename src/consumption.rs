//! ECA-aware fuel consumption along the route.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::InputError,
    fuel::{FuelQuantity, FuelRates, FuelType, PerFuel},
    prelude::*,
    quantity::{
        distance::NauticalMiles,
        mass::MetricTons,
        rate::TonsPerDay,
        speed::Knots,
        time::Days,
    },
    rob::{BunkerPoint, Leg},
    route::{self, RouteSegment},
};

/// Daily consumption at the service speed.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConsumptionProfile {
    /// Propulsion: VLSFO outside emission control areas, LSMGO inside.
    pub main_engine: TonsPerDay,

    /// Generators, always on LSMGO.
    pub auxiliary: TonsPerDay,
}

impl ConsumptionProfile {
    pub fn total(self) -> TonsPerDay {
        self.main_engine + self.auxiliary
    }

    /// Weather affects both engines, hull fouling and loading only the main one.
    #[must_use]
    pub fn adjusted(self, adjustments: Adjustments) -> Self {
        Self {
            main_engine: self.main_engine
                * adjustments.weather
                * adjustments.fouling
                * adjustments.loading,
            auxiliary: self.auxiliary * adjustments.weather,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        for (engine, rate) in [("main engine", self.main_engine), ("auxiliary", self.auxiliary)] {
            if !rate.is_non_negative() {
                return Err(InputError::InvalidRate { engine, rate });
            }
        }
        Ok(())
    }

    /// Daily rates per fuel type in or out of an emission control area.
    pub fn rates(self, is_eca: bool) -> FuelRates {
        if is_eca {
            PerFuel::new(TonsPerDay::ZERO, self.main_engine + self.auxiliary)
        } else {
            PerFuel::new(self.main_engine, self.auxiliary)
        }
    }
}

/// Multiplicative corrections to the base consumption.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Adjustments {
    pub weather: f64,
    pub fouling: f64,
    pub loading: f64,
}

impl Adjustments {
    pub const NONE: Self = Self { weather: 1.0, fouling: 1.0, loading: 1.0 };

    fn validate(self) -> Result<(), InputError> {
        for (factor, value) in
            [("weather", self.weather), ("fouling", self.fouling), ("loading", self.loading)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(InputError::InvalidAdjustment { factor, value });
            }
        }
        Ok(())
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SegmentConsumption {
    pub segment_id: String,
    pub from: String,
    pub to: String,

    /// Distance from the voyage origin to the segment start.
    pub start: NauticalMiles,

    pub distance: NauticalMiles,
    pub duration: Days,
    pub is_eca: bool,
    pub eca_zone: Option<String>,

    /// The fuel type the main engine runs on in this segment.
    pub main_engine_fuel: FuelType,

    pub daily: FuelRates,
    pub total: FuelQuantity,
}

impl SegmentConsumption {
    fn new(
        segment: &RouteSegment,
        start: NauticalMiles,
        profile: ConsumptionProfile,
        speed: Knots,
    ) -> Self {
        let duration = segment.distance / speed;
        let daily = profile.rates(segment.is_eca);
        Self {
            segment_id: segment.id.clone(),
            from: segment.from.clone(),
            to: segment.to.clone(),
            start,
            distance: segment.distance,
            duration,
            is_eca: segment.is_eca,
            eca_zone: segment.eca_zone.clone(),
            main_engine_fuel: if segment.is_eca { FuelType::Lsmgo } else { FuelType::Vlsfo },
            daily,
            total: daily * duration,
        }
    }

    pub fn end(&self) -> NauticalMiles {
        self.start + self.distance
    }

    /// Consumption over the part of the segment that overlaps with `from..to`.
    fn overlap(&self, from: NauticalMiles, to: NauticalMiles) -> FuelQuantity {
        let start = self.start.max(from);
        let end = self.end().min(to);
        if end <= start || self.distance <= NauticalMiles::ZERO {
            FuelQuantity::ZERO
        } else {
            self.total * ((end - start) / self.distance)
        }
    }

    fn leg(&self, from: &str, to: &str, start: NauticalMiles, end: NauticalMiles) -> Leg {
        let fraction =
            if self.distance > NauticalMiles::ZERO { (end - start) / self.distance } else { 0.0 };
        Leg {
            from: from.to_string(),
            to: to.to_string(),
            distance: end - start,
            duration: self.duration * fraction,
            daily: self.daily,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ConsumptionBreakdown {
    pub speed: Knots,

    /// Profile after the adjustments.
    pub profile: ConsumptionProfile,

    pub segments: Vec<SegmentConsumption>,
    pub total: FuelQuantity,
    pub distance: NauticalMiles,
    pub duration: Days,
    pub eca_distance: NauticalMiles,
}

impl ConsumptionBreakdown {
    #[must_use]
    pub fn eca_fraction(&self) -> f64 {
        if self.distance > NauticalMiles::ZERO { self.eca_distance / self.distance } else { 0.0 }
    }

    /// Voyage-average daily consumption per fuel type.
    pub fn average_daily(&self) -> FuelRates {
        average_daily(self.total, self.duration)
    }

    /// Consumption between two positions along the route, pro-rated within segments.
    pub fn between(&self, from: NauticalMiles, to: NauticalMiles) -> FuelQuantity {
        self.segments.iter().map(|segment| segment.overlap(from, to)).sum()
    }

    /// Consumption from the given position to the destination.
    pub fn remaining_after(&self, from: NauticalMiles) -> FuelQuantity {
        self.between(from, self.distance)
    }

    /// Simulator legs, one per segment.
    pub fn legs(&self) -> Vec<Leg> {
        self.segments
            .iter()
            .map(|segment| segment.leg(&segment.from, &segment.to, segment.start, segment.end()))
            .collect()
    }

    /// Simulator legs split at the given labelled positions.
    ///
    /// The cuts must be sorted by the position. For every cut, the returned point tells where
    /// a bunkering event at that position goes.
    pub fn split_at(&self, cuts: &[(NauticalMiles, &str)]) -> (Vec<Leg>, Vec<BunkerPoint>) {
        let mut legs: Vec<Leg> = Vec::with_capacity(self.segments.len() + cuts.len());
        let mut points = Vec::with_capacity(cuts.len());
        let mut cuts = cuts.iter().copied().peekable();

        while cuts.next_if(|(position, _)| *position <= NauticalMiles::ZERO).is_some() {
            points.push(BunkerPoint::BeforeDeparture);
        }

        for segment in &self.segments {
            let mut start = segment.start;
            let mut from = segment.from.clone();
            while let Some((position, label)) =
                cuts.next_if(|(position, _)| *position < segment.end())
            {
                if position > start {
                    legs.push(segment.leg(&from, label, start, position));
                    start = position;
                    label.clone_into(&mut from);
                }
                points.push(Self::point_after(&legs));
            }
            legs.push(segment.leg(&from, &segment.to, start, segment.end()));
            while cuts.next_if(|(position, _)| *position <= segment.end()).is_some() {
                points.push(Self::point_after(&legs));
            }
        }

        // Whatever is left lies beyond the destination:
        points.extend(cuts.map(|_| Self::point_after(&legs)));
        (legs, points)
    }

    fn point_after(legs: &[Leg]) -> BunkerPoint {
        legs.len().checked_sub(1).map_or(BunkerPoint::BeforeDeparture, BunkerPoint::AfterLeg)
    }

    /// Check the fuel switch invariants.
    ///
    /// # Returns
    ///
    /// Human-readable issues, empty when everything is consistent.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for segment in &self.segments {
            if segment.is_eca {
                if segment.total.vlsfo > MetricTons::ZERO {
                    issues.push(format!(
                        "segment `{}` lies in an ECA but burns {} of VLSFO",
                        segment.segment_id, segment.total.vlsfo,
                    ));
                }
                if segment.duration > Days::ZERO && segment.total.lsmgo <= MetricTons::ZERO {
                    issues.push(format!(
                        "segment `{}` lies in an ECA but burns no LSMGO",
                        segment.segment_id,
                    ));
                }
            } else if segment.duration > Days::ZERO
                && self.profile.main_engine > TonsPerDay::ZERO
                && segment.total.vlsfo <= MetricTons::ZERO
            {
                issues.push(format!(
                    "segment `{}` lies outside ECAs but burns no VLSFO",
                    segment.segment_id,
                ));
            }
        }
        issues
    }
}

/// Average daily rates over the given sailing time, zero for zero time.
pub fn average_daily(total: FuelQuantity, duration: Days) -> FuelRates {
    if duration > Days::ZERO {
        total.map(|_, quantity| TonsPerDay::new(quantity.get() / duration.get()))
    } else {
        FuelRates::ZERO
    }
}

/// Derive per-segment consumption with the hard VLSFO/LSMGO switch at ECA boundaries.
#[instrument(skip_all, fields(n_segments = segments.len(), %speed))]
pub fn compute_consumption(
    profile: ConsumptionProfile,
    segments: &[RouteSegment],
    speed: Knots,
    adjustments: Adjustments,
) -> Result<ConsumptionBreakdown, InputError> {
    if !speed.is_positive() {
        return Err(InputError::NonPositiveSpeed(speed));
    }
    profile.validate()?;
    adjustments.validate()?;
    let distance = route::validate(segments)?;

    let profile = profile.adjusted(adjustments);
    let segments = segments
        .iter()
        .scan(NauticalMiles::ZERO, |start, segment| {
            let consumption = SegmentConsumption::new(segment, *start, profile, speed);
            *start += segment.distance;
            Some(consumption)
        })
        .collect_vec();

    let breakdown = ConsumptionBreakdown {
        speed,
        profile,
        total: segments.iter().map(|segment| segment.total).sum(),
        duration: segments.iter().map(|segment| segment.duration).sum(),
        eca_distance: segments
            .iter()
            .filter(|segment| segment.is_eca)
            .map(|segment| segment.distance)
            .sum(),
        distance,
        segments,
    };
    debug!(
        total = %breakdown.total,
        duration = %breakdown.duration,
        eca_fraction = breakdown.eca_fraction(),
        "computed consumption",
    );
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const PROFILE: ConsumptionProfile =
        ConsumptionProfile { main_engine: TonsPerDay::new(30.0), auxiliary: TonsPerDay::new(3.0) };
    const SPEED: Knots = Knots::new(14.0);

    fn segment(id: &str, distance: f64, is_eca: bool) -> RouteSegment {
        RouteSegment::builder()
            .id(id)
            .from(format!("{id}-from"))
            .to(format!("{id}-to"))
            .distance(NauticalMiles::new(distance))
            .is_eca(is_eca)
            .build()
    }

    fn route() -> Vec<RouteSegment> {
        vec![
            segment("channel", 336.0, true),
            segment("biscay", 672.0, false),
            segment("med", 0.0, false),
        ]
    }

    /// 500 nm inside an ECA burns only LSMGO, at the combined rate.
    #[test]
    fn eca_segment() {
        let breakdown =
            compute_consumption(PROFILE, &[segment("eca", 500.0, true)], SPEED, Adjustments::NONE)
                .unwrap();
        let segment = &breakdown.segments[0];
        assert_eq!(segment.main_engine_fuel, FuelType::Lsmgo);
        assert_eq!(segment.total.vlsfo, MetricTons::ZERO);
        assert_abs_diff_eq!(
            segment.total.lsmgo.get(),
            33.0 * (500.0 / (14.0 * 24.0)),
            epsilon = 1e-9,
        );
    }

    #[test]
    fn non_eca_segment() {
        let breakdown =
            compute_consumption(PROFILE, &[segment("open", 336.0, false)], SPEED, Adjustments::NONE)
                .unwrap();
        let segment = &breakdown.segments[0];
        assert_eq!(segment.main_engine_fuel, FuelType::Vlsfo);
        assert_abs_diff_eq!(segment.total.vlsfo.get(), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(segment.total.lsmgo.get(), 3.0, epsilon = 1e-9);
    }

    /// Propulsion burns the same mass on either side of the ECA boundary.
    #[test]
    fn fuel_conservation() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        for segment in &breakdown.segments {
            let propulsion = segment.total.vlsfo + segment.total.lsmgo
                - PROFILE.auxiliary * segment.duration;
            assert_abs_diff_eq!(
                propulsion.get(),
                (PROFILE.main_engine * segment.duration).get(),
                epsilon = 1e-9,
            );
        }
    }

    #[test]
    fn zero_length_segment() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        let segment = &breakdown.segments[2];
        assert_eq!(segment.duration, Days::ZERO);
        assert_eq!(segment.total, FuelQuantity::ZERO);
        assert!(breakdown.validate().is_empty());
    }

    #[test]
    fn totals() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        assert_eq!(breakdown.distance, NauticalMiles::new(1008.0));
        assert_abs_diff_eq!(breakdown.duration.get(), 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.total.vlsfo.get(), 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.total.lsmgo.get(), 33.0 + 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.eca_fraction(), 1.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.average_daily().lsmgo.get(), 13.0, epsilon = 1e-9);
    }

    #[test]
    fn adjustments() {
        let adjustments = Adjustments { weather: 1.1, fouling: 1.05, loading: 0.9 };
        let breakdown =
            compute_consumption(PROFILE, &[segment("open", 336.0, false)], SPEED, adjustments)
                .unwrap();
        assert_abs_diff_eq!(breakdown.total.vlsfo.get(), 30.0 * 1.1 * 1.05 * 0.9, epsilon = 1e-9);
        assert_abs_diff_eq!(breakdown.total.lsmgo.get(), 3.0 * 1.1, epsilon = 1e-9);
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(
            compute_consumption(PROFILE, &route(), Knots::ZERO, Adjustments::NONE).unwrap_err(),
            InputError::NonPositiveSpeed(Knots::ZERO),
        );
        assert_eq!(
            compute_consumption(PROFILE, &[], SPEED, Adjustments::NONE).unwrap_err(),
            InputError::EmptyRoute,
        );
        let adjustments = Adjustments { weather: 0.0, ..Adjustments::NONE };
        assert!(matches!(
            compute_consumption(PROFILE, &route(), SPEED, adjustments),
            Err(InputError::InvalidAdjustment { factor: "weather", .. }),
        ));
    }

    #[test]
    fn validation_reports_blended_segments() {
        let mut breakdown =
            compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        breakdown.segments[0].total.vlsfo = MetricTons::new(1.0);
        breakdown.segments[1].total.vlsfo = MetricTons::ZERO;
        let issues = breakdown.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("channel"));
        assert!(issues[1].contains("biscay"));
    }

    #[test]
    fn between_pro_rates_segments() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        // Half of the ECA segment and a quarter of the open-sea one:
        let quantity = breakdown.between(NauticalMiles::new(168.0), NauticalMiles::new(504.0));
        assert_abs_diff_eq!(quantity.vlsfo.get(), 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(quantity.lsmgo.get(), 16.5 + 1.5, epsilon = 1e-9);
        assert_eq!(breakdown.between(NauticalMiles::ZERO, breakdown.distance), breakdown.total);
    }

    #[test]
    fn split_inside_a_segment() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        let (legs, points) = breakdown.split_at(&[
            (NauticalMiles::ZERO, "Rotterdam"),
            (NauticalMiles::new(672.0), "Port"),
        ]);
        assert_eq!(points, [BunkerPoint::BeforeDeparture, BunkerPoint::AfterLeg(1)]);
        assert_eq!(legs.len(), 4);
        assert_eq!(legs[1].to, "Port");
        assert_eq!(legs[2].from, "Port");
        assert_eq!(legs[1].distance, NauticalMiles::new(336.0));
        assert_abs_diff_eq!(legs[1].duration.get(), 1.0, epsilon = 1e-9);
        let total: FuelQuantity = legs.iter().map(Leg::consumption).sum();
        assert_abs_diff_eq!(total.total().get(), breakdown.total.total().get(), epsilon = 1e-9);
    }

    #[test]
    fn split_on_a_boundary() {
        let breakdown = compute_consumption(PROFILE, &route(), SPEED, Adjustments::NONE).unwrap();
        let (legs, points) = breakdown.split_at(&[(NauticalMiles::new(336.0), "Dover")]);
        assert_eq!(points, [BunkerPoint::AfterLeg(0)]);
        assert_eq!(legs.len(), 3);
    }
}
