use log::{debug, info, warn};

use crate::elevator::destinations::{DoorCountdown, ElevatorMemory};
use crate::shared::{CallBook, ClaimedCall, Direction, Elevator, Floor, Phase, Travel};

/**
 * Advances an elevator by one tick.
 *
 * The `ElevatorFSM` moves an elevator one floor per tick towards the stops in
 * its destination tracker, opens and holds the doors at each stop, and picks
 * up waiting riders that lie ahead of it while it is moving.
 *
 * # Fields
 * - `door_open_ticks`:     Ticks the doors stay open before they close.
 *
 * # Transitions
 * - `Idle`:            Departs towards the nearest stop, or opens doors if the stop is here.
 * - `Moving`:          Claims calls ahead, moves one floor, stops if the floor is owed a stop.
 * - `OpeningDoors`:    Opens doors, starts the door timer and clears the stop.
 * - `ClosingDoors`:    Counts the timer down; on expiry closes doors, merges boarding
 *                      destinations and departs towards the nearest stop or goes idle.
 */
#[derive(Debug, Clone, Copy)]
pub struct ElevatorFSM {
    door_open_ticks: u32,
}

impl ElevatorFSM {
    pub fn new(door_open_ticks: u32) -> ElevatorFSM {
        ElevatorFSM { door_open_ticks }
    }

    /// Runs one transition for `elevator` in a building with `floors` floors.
    pub fn step(
        &self,
        elevator: &mut Elevator,
        memory: &mut ElevatorMemory,
        floors: Floor,
        calls: &mut CallBook,
    ) {
        match elevator.phase {
            Phase::Idle => {
                if !memory.destinations.is_empty() {
                    elevator.phase = depart(elevator.current_floor, memory, Direction::None);
                }
            }

            Phase::Moving { travel } => self.handle_moving(elevator, memory, floors, calls, travel),

            Phase::OpeningDoors { heading } => {
                memory.door_timer.reset(self.door_open_ticks);
                memory.destinations.remove(elevator.current_floor);
                elevator.phase = Phase::ClosingDoors { heading };
                info!(
                    "Elevator {} doors opening at floor {}",
                    elevator.id, elevator.current_floor
                );
            }

            Phase::ClosingDoors { heading } => {
                if memory.door_timer.count_down() == DoorCountdown::Holding {
                    return;
                }
                debug!("Elevator {} doors closed", elevator.id);

                for boarded in calls.claim_boarding(elevator.current_floor) {
                    if let Some(destination) = boarded.destination {
                        if route(elevator, memory, floors, destination) {
                            info!(
                                "Elevator {} received new destination: {}",
                                elevator.id, destination
                            );
                        }
                    }
                }

                elevator.phase = depart(elevator.current_floor, memory, heading);
            }
        }
    }

    fn handle_moving(
        &self,
        elevator: &mut Elevator,
        memory: &mut ElevatorMemory,
        floors: Floor,
        calls: &mut CallBook,
        travel: Travel,
    ) {
        let floor = elevator.current_floor;

        for claimed in calls.claim_ahead(floor, travel) {
            info!(
                "Elevator {} picking up call {} at floor {} on the way",
                elevator.id, claimed.call_id, claimed.pickup
            );
            route_claimed(elevator, memory, floors, &claimed);
        }

        let next = match travel {
            Travel::Up => floor.checked_add(1).filter(|&f| f < floors),
            Travel::Down => floor.checked_sub(1),
        };

        let next = match next {
            Some(next) if memory.destinations.has_stop_ahead(floor, travel) => next,
            _ => {
                // Nothing left in this direction; pick a new heading without moving.
                warn!(
                    "Elevator {} has no stop ahead while moving {:?} from floor {}",
                    elevator.id, travel, floor
                );
                elevator.phase = depart(floor, memory, travel.into());
                return;
            }
        };

        elevator.current_floor = next;
        if memory.destinations.contains(next) {
            elevator.phase = Phase::OpeningDoors {
                heading: travel.into(),
            };
        }
    }
}

/// Adds the pickup and destination of a claimed call to the stop list.
pub fn route_claimed(
    elevator: &Elevator,
    memory: &mut ElevatorMemory,
    floors: Floor,
    claimed: &ClaimedCall,
) {
    route(elevator, memory, floors, claimed.pickup);
    if let Some(destination) = claimed.destination {
        route(elevator, memory, floors, destination);
    }
}

fn route(elevator: &Elevator, memory: &mut ElevatorMemory, floors: Floor, floor: Floor) -> bool {
    if floor >= floors {
        warn!(
            "Elevator {} ignoring stop at floor {} outside building {}",
            elevator.id, floor, elevator.building_id
        );
        return false;
    }
    memory.destinations.insert(floor)
}

// Next phase for an elevator standing at `floor` with doors closed.
fn depart(floor: Floor, memory: &ElevatorMemory, heading: Direction) -> Phase {
    match memory.destinations.nearest(floor) {
        None => Phase::Idle,
        Some(stop) => match Travel::towards(floor, stop) {
            Some(travel) => Phase::Moving { travel },
            None => Phase::OpeningDoors { heading },
        },
    }
}
