use log::info;

use crate::elevator::fsm::route_claimed;
use crate::elevator::FleetMemory;
use crate::shared::{Building, CallBook, CallId, ElevatorId, Floor};

/// A call handed to an idle elevator during one dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub call_id: CallId,
    pub elevator_id: ElevatorId,
    pub pickup: Floor,
}

/**
 * Assigns waiting calls to idle elevators.
 *
 * Calls are considered oldest first. Each call goes to the idle elevator
 * closest to its pickup floor; on equal distance the elevator listed first in
 * the building wins. An elevator takes at most one call per pass, since it
 * leaves `Idle` in the same tick. Calls left over stay unhandled for the next
 * tick or for an elevator passing by.
 */
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Dispatcher {
        Dispatcher
    }

    pub fn dispatch(
        &self,
        building: &Building,
        fleet: &mut FleetMemory,
        calls: &mut CallBook,
    ) -> Vec<Assignment> {
        let mut available: Vec<bool> = building
            .elevators
            .iter()
            .map(|elevator| elevator.is_idle())
            .collect();
        let mut assignments = Vec::new();

        for (call_id, pickup) in calls.unhandled() {
            let Some(index) = nearest_available(building, &available, pickup) else {
                break;
            };
            let Some(claimed) = calls.claim(call_id) else {
                continue;
            };

            let elevator = &building.elevators[index];
            route_claimed(elevator, fleet.memory_mut(elevator.id), building.floors, &claimed);
            available[index] = false;

            info!("Elevator {} is handling call {}", elevator.id, call_id);
            assignments.push(Assignment {
                call_id,
                elevator_id: elevator.id,
                pickup,
            });
        }

        assignments
    }
}

fn nearest_available(building: &Building, available: &[bool], pickup: Floor) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (index, elevator) in building.elevators.iter().enumerate() {
        if !available[index] {
            continue;
        }
        let distance = elevator.current_floor.abs_diff(pickup);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}
