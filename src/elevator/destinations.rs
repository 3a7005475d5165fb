/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::HashMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ElevatorId, Floor, Travel};

/***************************************/
/*       Public data structures        */
/***************************************/

/// Floors an elevator still owes a stop, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationTracker {
    stops: Vec<Floor>,
}

impl DestinationTracker {
    pub fn new() -> DestinationTracker {
        DestinationTracker { stops: Vec::new() }
    }

    /// Adds a stop. Returns false if the floor was already owed a stop.
    pub fn insert(&mut self, floor: Floor) -> bool {
        if self.stops.contains(&floor) {
            return false;
        }
        self.stops.push(floor);
        true
    }

    pub fn remove(&mut self, floor: Floor) -> bool {
        match self.stops.iter().position(|&f| f == floor) {
            Some(index) => {
                self.stops.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, floor: Floor) -> bool {
        self.stops.contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Floor> + '_ {
        self.stops.iter().copied()
    }

    /// Stop closest to `from`. On equal distance the earliest added stop wins.
    pub fn nearest(&self, from: Floor) -> Option<Floor> {
        let mut best: Option<Floor> = None;
        for &stop in &self.stops {
            match best {
                Some(current) if current.abs_diff(from) <= stop.abs_diff(from) => {}
                _ => best = Some(stop),
            }
        }
        best
    }

    pub fn has_stop_ahead(&self, from: Floor, travel: Travel) -> bool {
        self.stops.iter().any(|&stop| travel.is_ahead(from, stop))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCountdown {
    Holding,
    Expired,
}

/// Ticks left before open doors start to close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoorTimer {
    remaining: u32,
}

impl DoorTimer {
    pub fn reset(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn count_down(&mut self) -> DoorCountdown {
        if self.remaining > 0 {
            self.remaining -= 1;
            DoorCountdown::Holding
        } else {
            DoorCountdown::Expired
        }
    }
}

/// In-process state of one elevator that is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElevatorMemory {
    pub destinations: DestinationTracker,
    pub door_timer: DoorTimer,
}

/**
 * Per-elevator memory for every elevator the scheduler has seen.
 *
 * Entries are created lazily the first time an elevator id is looked up and
 * are owned by the tick scheduler, which stages a copy per tick and keeps it
 * only if the tick was persisted.
 */
#[derive(Debug, Clone, Default)]
pub struct FleetMemory {
    elevators: HashMap<ElevatorId, ElevatorMemory>,
}

impl FleetMemory {
    pub fn new() -> FleetMemory {
        FleetMemory {
            elevators: HashMap::new(),
        }
    }

    pub fn memory_mut(&mut self, id: ElevatorId) -> &mut ElevatorMemory {
        self.elevators.entry(id).or_default()
    }

    pub fn memory(&self, id: ElevatorId) -> Option<&ElevatorMemory> {
        self.elevators.get(&id)
    }

    pub fn destinations(&self, id: ElevatorId) -> Vec<Floor> {
        self.elevators
            .get(&id)
            .map(|memory| memory.destinations.iter().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.elevators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevators.is_empty()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod destinations_tests {
    use super::*;

    #[test]
    fn test_tracker_collapses_duplicate_stops() {
        let mut tracker = DestinationTracker::new();

        assert!(tracker.insert(5));
        assert!(!tracker.insert(5));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_tracker_nearest_prefers_earliest_on_tie() {
        // Purpose: Floors 2 and 6 are both 2 away from 4; the one added first wins

        let mut tracker = DestinationTracker::new();
        tracker.insert(6);
        tracker.insert(2);
        tracker.insert(9);

        assert_eq!(tracker.nearest(4), Some(6));
        tracker.remove(6);
        assert_eq!(tracker.nearest(4), Some(2));
    }

    #[test]
    fn test_tracker_nearest_on_empty_is_none() {
        assert_eq!(DestinationTracker::new().nearest(3), None);
    }

    #[test]
    fn test_tracker_stop_ahead() {
        let mut tracker = DestinationTracker::new();
        tracker.insert(2);

        assert!(tracker.has_stop_ahead(0, Travel::Up));
        assert!(!tracker.has_stop_ahead(2, Travel::Up));
        assert!(tracker.has_stop_ahead(5, Travel::Down));
    }

    #[test]
    fn test_door_timer_counts_down_then_expires() {
        let mut timer = DoorTimer::default();
        timer.reset(2);

        assert_eq!(timer.count_down(), DoorCountdown::Holding);
        assert_eq!(timer.count_down(), DoorCountdown::Holding);
        assert_eq!(timer.count_down(), DoorCountdown::Expired);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_fleet_memory_initializes_lazily() {
        let mut fleet = FleetMemory::new();
        assert!(fleet.memory(1).is_none());

        fleet.memory_mut(1).destinations.insert(4);

        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.destinations(1), vec![4]);
        assert!(fleet.destinations(2).is_empty());
    }
}
