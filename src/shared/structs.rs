/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::time::SystemTime;

/***************************************/
/*            Identifiers              */
/***************************************/
pub type Floor = u8;
pub type BuildingId = u32;
pub type ElevatorId = u32;
pub type CallId = u64;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElevatorStatus {
    Idle,
    MovingUp,
    MovingDown,
    OpeningDoors,
    ClosingDoors,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    None,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorStatus {
    Open,
    Closed,
}

/// Direction of an elevator that is actually travelling. Unlike [`Direction`]
/// it has no "none" case, so a moving phase can never lack a heading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Travel {
    Up,
    Down,
}

impl Travel {
    /// Direction of travel from `from` towards `to`, or `None` when already there.
    pub fn towards(from: Floor, to: Floor) -> Option<Travel> {
        if to > from {
            Some(Travel::Up)
        } else if to < from {
            Some(Travel::Down)
        } else {
            None
        }
    }

    /// True when `floor` lies strictly beyond `current` in this direction.
    pub fn is_ahead(&self, current: Floor, floor: Floor) -> bool {
        match *self {
            Travel::Up => floor > current,
            Travel::Down => floor < current,
        }
    }
}

impl From<Travel> for Direction {
    fn from(travel: Travel) -> Self {
        match travel {
            Travel::Up => Direction::Up,
            Travel::Down => Direction::Down,
        }
    }
}

/**
 * Phase of an elevator.
 *
 * Status, direction and door status are all derived from the phase, so an
 * inconsistent combination (e.g. moving up with direction down, or idle with
 * doors open) cannot be stored.
 *
 * # Variants
 * - `Idle`:            Parked with doors closed and no direction.
 * - `Moving`:          Travelling one floor per tick in `travel` direction.
 * - `OpeningDoors`:    Stopped at a floor; doors open on the next tick.
 * - `ClosingDoors`:    Doors are open and counting down towards closing.
 *
 * `heading` keeps the direction the elevator arrived with while stopped.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Moving { travel: Travel },
    OpeningDoors { heading: Direction },
    ClosingDoors { heading: Direction },
}

impl Phase {
    pub fn status(&self) -> ElevatorStatus {
        match *self {
            Phase::Idle => ElevatorStatus::Idle,
            Phase::Moving { travel: Travel::Up } => ElevatorStatus::MovingUp,
            Phase::Moving { travel: Travel::Down } => ElevatorStatus::MovingDown,
            Phase::OpeningDoors { .. } => ElevatorStatus::OpeningDoors,
            Phase::ClosingDoors { .. } => ElevatorStatus::ClosingDoors,
        }
    }

    pub fn direction(&self) -> Direction {
        match *self {
            Phase::Idle => Direction::None,
            Phase::Moving { travel } => travel.into(),
            Phase::OpeningDoors { heading } | Phase::ClosingDoors { heading } => heading,
        }
    }

    // Doors stay open for the whole closing countdown.
    pub fn door_status(&self) -> DoorStatus {
        match *self {
            Phase::ClosingDoors { .. } => DoorStatus::Open,
            _ => DoorStatus::Closed,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Elevator {
    pub id: ElevatorId,
    pub building_id: BuildingId,
    pub current_floor: Floor,
    pub phase: Phase,
}

impl Elevator {
    pub fn new(id: ElevatorId, building_id: BuildingId) -> Elevator {
        Elevator {
            id,
            building_id,
            current_floor: 0,
            phase: Phase::Idle,
        }
    }

    pub fn status(&self) -> ElevatorStatus {
        self.phase.status()
    }

    pub fn direction(&self) -> Direction {
        self.phase.direction()
    }

    pub fn door_status(&self) -> DoorStatus {
        self.phase.door_status()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn snapshot(&self) -> ElevatorSnapshot {
        ElevatorSnapshot {
            id: self.id,
            current_floor: self.current_floor,
            status: self.status(),
            direction: self.direction(),
            door_status: self.door_status(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub owner: String,
    pub floors: Floor,
    pub elevators: Vec<Elevator>,
}

impl Building {
    pub fn contains_floor(&self, floor: Floor) -> bool {
        floor < self.floors
    }
}

/**
 * A floor call made by a rider.
 *
 * `is_handled` flips to true once, when a dispatcher or a passing elevator
 * takes the call. `destination_routed` records that the destination floor has
 * been put into some elevator's stop list.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: CallId,
    pub building_id: BuildingId,
    pub requested_floor: Floor,
    pub destination_floor: Option<Floor>,
    pub created_at: SystemTime,
    pub is_handled: bool,
    #[serde(default)]
    pub destination_routed: bool,
}

impl Call {
    pub fn new(id: CallId, building_id: BuildingId, requested_floor: Floor) -> Call {
        Call {
            id,
            building_id,
            requested_floor,
            destination_floor: None,
            created_at: SystemTime::now(),
            is_handled: false,
            destination_routed: false,
        }
    }

    /// Marks the call handled. Returns false if it already was.
    pub fn mark_handled(&mut self) -> bool {
        if self.is_handled {
            return false;
        }
        self.is_handled = true;
        true
    }

    /// Destination that still needs to be routed into a stop list, if any.
    pub fn unrouted_destination(&self) -> Option<Floor> {
        if self.destination_routed {
            None
        } else {
            self.destination_floor
        }
    }
}

/// State pushed to subscribers after every tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorSnapshot {
    pub id: ElevatorId,
    pub current_floor: Floor,
    pub status: ElevatorStatus,
    pub direction: Direction,
    pub door_status: DoorStatus,
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod structs_tests {
    use super::*;

    #[test]
    fn test_phase_status_direction_pairs_are_consistent() {
        // Purpose: Every phase maps to one of the valid status/direction pairs

        let phases = [
            Phase::Idle,
            Phase::Moving { travel: Travel::Up },
            Phase::Moving { travel: Travel::Down },
            Phase::OpeningDoors { heading: Direction::None },
            Phase::ClosingDoors { heading: Direction::Up },
        ];

        for phase in phases {
            match phase.status() {
                ElevatorStatus::Idle => assert_eq!(phase.direction(), Direction::None),
                ElevatorStatus::MovingUp => assert_eq!(phase.direction(), Direction::Up),
                ElevatorStatus::MovingDown => assert_eq!(phase.direction(), Direction::Down),
                ElevatorStatus::OpeningDoors => assert_eq!(phase.door_status(), DoorStatus::Closed),
                ElevatorStatus::ClosingDoors => assert_eq!(phase.door_status(), DoorStatus::Open),
            }
        }
    }

    #[test]
    fn test_new_elevator_is_parked_at_ground_floor() {
        let elevator = Elevator::new(7, 1);

        assert_eq!(elevator.current_floor, 0);
        assert_eq!(elevator.status(), ElevatorStatus::Idle);
        assert_eq!(elevator.direction(), Direction::None);
        assert_eq!(elevator.door_status(), DoorStatus::Closed);
    }

    #[test]
    fn test_call_is_handled_only_once() {
        let mut call = Call::new(1, 1, 4);

        assert!(call.mark_handled());
        assert!(!call.mark_handled());
        assert!(call.is_handled);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut elevator = Elevator::new(3, 1);
        elevator.current_floor = 2;
        elevator.phase = Phase::Moving { travel: Travel::Up };

        let json = serde_json::to_value(elevator.snapshot()).unwrap();

        assert_eq!(json["currentFloor"], 2);
        assert_eq!(json["status"], "MovingUp");
        assert_eq!(json["direction"], "Up");
        assert_eq!(json["doorStatus"], "Closed");
    }

    #[test]
    fn test_phase_spells_directions_like_snapshot() {
        // Purpose: Stored phases and published snapshots name a direction the same way

        let moving = Phase::Moving { travel: Travel::Down };
        let stopped = Phase::OpeningDoors { heading: Direction::Down };

        let moving_json = serde_json::to_value(moving).unwrap();
        let stopped_json = serde_json::to_value(stopped).unwrap();

        assert_eq!(moving_json["travel"], "Down");
        assert_eq!(moving_json["travel"], stopped_json["heading"]);
        assert_eq!(serde_json::to_value(moving.direction()).unwrap(), "Down");
    }
}
