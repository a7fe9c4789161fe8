use serde::{Deserialize, Serialize};

use crate::{
    consumption::ConsumptionProfile,
    error::InputError,
    fuel::{FuelQuantity, FuelType},
};

/// What the vessel brings into the voyage.
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct VesselProfile {
    /// Remaining on board at departure.
    pub initial_rob: FuelQuantity,

    /// Usable tank capacity.
    pub capacity: FuelQuantity,

    pub consumption: ConsumptionProfile,
}

impl VesselProfile {
    pub fn validate(&self) -> Result<(), InputError> {
        validate_tanks(self.initial_rob, self.capacity)?;
        self.consumption.validate()
    }
}

pub fn validate_tanks(rob: FuelQuantity, capacity: FuelQuantity) -> Result<(), InputError> {
    for fuel in FuelType::all() {
        let (rob, capacity) = (rob.get(fuel), capacity.get(fuel));
        if !capacity.is_positive() {
            return Err(InputError::NonPositiveCapacity { fuel, capacity });
        }
        if !rob.is_non_negative() {
            return Err(InputError::NegativeRob { fuel, rob });
        }
        if rob > capacity {
            return Err(InputError::RobExceedsCapacity { fuel, rob, capacity });
        }
    }
    Ok(())
}
