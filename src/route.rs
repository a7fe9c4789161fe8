use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{error::InputError, quantity::distance::NauticalMiles};

/// Ordered unit of travel between two consecutive route points.
#[derive(Clone, Debug, Builder, Deserialize, Serialize)]
pub struct RouteSegment {
    #[builder(into)]
    pub id: String,

    #[builder(into)]
    pub from: String,

    #[builder(into)]
    pub to: String,

    pub distance: NauticalMiles,

    /// Whether the segment lies inside an emission control area.
    #[builder(default)]
    #[serde(default)]
    pub is_eca: bool,

    #[builder(into)]
    #[serde(default)]
    pub eca_zone: Option<String>,
}

/// Check the segments and return the total voyage distance.
pub fn validate(segments: &[RouteSegment]) -> Result<NauticalMiles, InputError> {
    if segments.is_empty() {
        return Err(InputError::EmptyRoute);
    }
    if let Some(segment) = segments.iter().find(|segment| !segment.distance.is_non_negative()) {
        return Err(InputError::InvalidDistance {
            segment: segment.id.clone(),
            distance: segment.distance,
        });
    }
    Ok(segments.iter().map(|segment| segment.distance).sum())
}
