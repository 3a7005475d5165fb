use log::info;

use crate::error::IntakeError;
use crate::shared::{Building, BuildingId, Call, Floor};
use crate::storage::Repository;

/**
 * Entry point for riders pressing buttons.
 *
 * Input is validated here; the engine behind it assumes every call names an
 * existing building and a floor inside it.
 */
pub struct CallIntake<R: Repository> {
    repository: R,
}

impl<R: Repository> CallIntake<R> {
    pub fn new(repository: R) -> CallIntake<R> {
        CallIntake { repository }
    }

    /// Records a new, unhandled call at `requested_floor`.
    pub fn create_call(
        &self,
        building_id: BuildingId,
        requested_floor: Floor,
    ) -> Result<Call, IntakeError> {
        let building = self.building(building_id)?;
        check_floor(&building, requested_floor)?;

        let call = self.repository.create_call(building_id, requested_floor)?;
        info!(
            "Call {} created at floor {} in building {}",
            call.id, requested_floor, building_id
        );
        Ok(call)
    }

    /// Attaches a destination to the newest call at `pickup` still lacking one.
    pub fn update_destination(
        &self,
        building_id: BuildingId,
        pickup: Floor,
        destination: Floor,
    ) -> Result<Call, IntakeError> {
        let building = self.building(building_id)?;
        check_floor(&building, pickup)?;
        check_floor(&building, destination)?;

        match self
            .repository
            .attach_destination(building_id, pickup, destination)?
        {
            Some(call) => {
                info!(
                    "Call {} at floor {} now heading to floor {}",
                    call.id, pickup, destination
                );
                Ok(call)
            }
            None => Err(IntakeError::NotFound {
                building: building_id,
                pickup,
            }),
        }
    }

    fn building(&self, building_id: BuildingId) -> Result<Building, IntakeError> {
        self.repository
            .find_building(building_id)?
            .ok_or(IntakeError::UnknownBuilding(building_id))
    }
}

fn check_floor(building: &Building, floor: Floor) -> Result<(), IntakeError> {
    if building.contains_floor(floor) {
        Ok(())
    } else {
        Err(IntakeError::InvalidFloor {
            building: building.id,
            floor,
            floors: building.floors,
        })
    }
}
