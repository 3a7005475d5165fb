/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::error::RepositoryError;
use crate::shared::{Building, BuildingId, Call, CallId, Elevator, ElevatorId, Floor};

/**
 * Persistent store behind the tick scheduler and the call intake.
 *
 * `save_all` must apply every record or none of them.
 */
pub trait Repository {
    fn load_buildings_with_elevators(&self) -> Result<Vec<Building>, RepositoryError>;

    /// Unhandled calls of a building, oldest first.
    fn load_unhandled_calls(&self, building_id: BuildingId) -> Result<Vec<Call>, RepositoryError>;

    /// Handled calls of a building whose destination has not been routed yet.
    fn load_pending_destinations(
        &self,
        building_id: BuildingId,
    ) -> Result<Vec<Call>, RepositoryError>;

    fn save_all(&self, elevators: &[Elevator], calls: &[Call]) -> Result<(), RepositoryError>;

    fn find_building(&self, building_id: BuildingId) -> Result<Option<Building>, RepositoryError>;

    fn create_call(
        &self,
        building_id: BuildingId,
        requested_floor: Floor,
    ) -> Result<Call, RepositoryError>;

    /// Sets the destination on the newest call at `pickup` that has none yet.
    fn attach_destination(
        &self,
        building_id: BuildingId,
        pickup: Floor,
        destination: Floor,
    ) -> Result<Option<Call>, RepositoryError>;
}

impl<R: Repository + ?Sized> Repository for Arc<R> {
    fn load_buildings_with_elevators(&self) -> Result<Vec<Building>, RepositoryError> {
        (**self).load_buildings_with_elevators()
    }

    fn load_unhandled_calls(&self, building_id: BuildingId) -> Result<Vec<Call>, RepositoryError> {
        (**self).load_unhandled_calls(building_id)
    }

    fn load_pending_destinations(
        &self,
        building_id: BuildingId,
    ) -> Result<Vec<Call>, RepositoryError> {
        (**self).load_pending_destinations(building_id)
    }

    fn save_all(&self, elevators: &[Elevator], calls: &[Call]) -> Result<(), RepositoryError> {
        (**self).save_all(elevators, calls)
    }

    fn find_building(&self, building_id: BuildingId) -> Result<Option<Building>, RepositoryError> {
        (**self).find_building(building_id)
    }

    fn create_call(
        &self,
        building_id: BuildingId,
        requested_floor: Floor,
    ) -> Result<Call, RepositoryError> {
        (**self).create_call(building_id, requested_floor)
    }

    fn attach_destination(
        &self,
        building_id: BuildingId,
        pickup: Floor,
        destination: Floor,
    ) -> Result<Option<Call>, RepositoryError> {
        (**self).attach_destination(building_id, pickup, destination)
    }
}

/***************************************/
/*         In-memory repository        */
/***************************************/
#[derive(Debug, Default)]
struct Store {
    buildings: BTreeMap<BuildingId, Building>,
    calls: BTreeMap<CallId, Call>,
    next_call_id: CallId,
}

/// Repository kept entirely in process memory behind one lock.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
}

impl InMemoryRepository {
    pub fn new() -> InMemoryRepository {
        InMemoryRepository::default()
    }

    /// Creates every configured building with its elevators parked at floor 0.
    pub fn from_config(config: &Config) -> InMemoryRepository {
        let repository = InMemoryRepository::new();
        let mut next_elevator_id: ElevatorId = 1;

        if let Ok(mut store) = repository.store.lock() {
            for (index, building) in config.buildings.iter().enumerate() {
                let building_id = index as BuildingId + 1;
                let elevators = (0..building.elevators)
                    .map(|_| {
                        let elevator = Elevator::new(next_elevator_id, building_id);
                        next_elevator_id += 1;
                        elevator
                    })
                    .collect();

                store.buildings.insert(
                    building_id,
                    Building {
                        id: building_id,
                        name: building.name.clone(),
                        owner: building.owner.clone(),
                        floors: building.floors,
                        elevators,
                    },
                );
            }
        }
        repository
    }

    pub fn insert_building(&self, building: Building) -> Result<(), RepositoryError> {
        self.lock()?.buildings.insert(building.id, building);
        Ok(())
    }

    pub fn call(&self, call_id: CallId) -> Result<Option<Call>, RepositoryError> {
        Ok(self.lock()?.calls.get(&call_id).cloned())
    }

    pub fn calls(&self) -> Result<Vec<Call>, RepositoryError> {
        Ok(self.lock()?.calls.values().cloned().collect())
    }

    pub fn elevator(&self, elevator_id: ElevatorId) -> Result<Option<Elevator>, RepositoryError> {
        let store = self.lock()?;
        Ok(store
            .buildings
            .values()
            .flat_map(|building| building.elevators.iter())
            .find(|elevator| elevator.id == elevator_id)
            .cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.store.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

impl Repository for InMemoryRepository {
    fn load_buildings_with_elevators(&self) -> Result<Vec<Building>, RepositoryError> {
        Ok(self.lock()?.buildings.values().cloned().collect())
    }

    fn load_unhandled_calls(&self, building_id: BuildingId) -> Result<Vec<Call>, RepositoryError> {
        let store = self.lock()?;
        let mut calls: Vec<Call> = store
            .calls
            .values()
            .filter(|call| call.building_id == building_id && !call.is_handled)
            .cloned()
            .collect();
        calls.sort_by_key(|call| (call.created_at, call.id));
        Ok(calls)
    }

    fn load_pending_destinations(
        &self,
        building_id: BuildingId,
    ) -> Result<Vec<Call>, RepositoryError> {
        let store = self.lock()?;
        Ok(store
            .calls
            .values()
            .filter(|call| {
                call.building_id == building_id
                    && call.is_handled
                    && call.unrouted_destination().is_some()
            })
            .cloned()
            .collect())
    }

    fn save_all(&self, elevators: &[Elevator], calls: &[Call]) -> Result<(), RepositoryError> {
        let mut store = self.lock()?;

        // Check everything before touching anything.
        for elevator in elevators {
            let known = store
                .buildings
                .get(&elevator.building_id)
                .map(|building| building.elevators.iter().any(|e| e.id == elevator.id))
                .unwrap_or(false);
            if !known {
                return Err(RepositoryError::UnknownBuilding(elevator.building_id));
            }
        }
        for call in calls {
            if !store.buildings.contains_key(&call.building_id) {
                return Err(RepositoryError::UnknownBuilding(call.building_id));
            }
        }

        for elevator in elevators {
            if let Some(stored) = store
                .buildings
                .get_mut(&elevator.building_id)
                .and_then(|building| building.elevators.iter_mut().find(|e| e.id == elevator.id))
            {
                *stored = elevator.clone();
            }
        }
        for call in calls {
            match store.calls.get_mut(&call.id) {
                Some(stored) => {
                    // A destination attached by intake after this tick loaded the call wins.
                    let destination_floor = stored.destination_floor.or(call.destination_floor);
                    let destination_routed = call.destination_routed
                        && destination_floor == call.destination_floor;
                    *stored = Call {
                        destination_floor,
                        destination_routed,
                        is_handled: stored.is_handled || call.is_handled,
                        ..call.clone()
                    };
                }
                None => {
                    store.calls.insert(call.id, call.clone());
                }
            }
        }
        Ok(())
    }

    fn find_building(&self, building_id: BuildingId) -> Result<Option<Building>, RepositoryError> {
        Ok(self.lock()?.buildings.get(&building_id).cloned())
    }

    fn create_call(
        &self,
        building_id: BuildingId,
        requested_floor: Floor,
    ) -> Result<Call, RepositoryError> {
        let mut store = self.lock()?;
        if !store.buildings.contains_key(&building_id) {
            return Err(RepositoryError::UnknownBuilding(building_id));
        }

        store.next_call_id += 1;
        let call = Call::new(store.next_call_id, building_id, requested_floor);
        store.calls.insert(call.id, call.clone());
        Ok(call)
    }

    fn attach_destination(
        &self,
        building_id: BuildingId,
        pickup: Floor,
        destination: Floor,
    ) -> Result<Option<Call>, RepositoryError> {
        let mut store = self.lock()?;
        let newest = store
            .calls
            .values_mut()
            .filter(|call| {
                call.building_id == building_id
                    && call.requested_floor == pickup
                    && call.destination_floor.is_none()
            })
            .max_by_key(|call| (call.created_at, call.id));

        Ok(newest.map(|call| {
            call.destination_floor = Some(destination);
            call.clone()
        }))
    }
}
