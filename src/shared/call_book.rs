/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeSet;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Call, CallId, Floor, Travel};

/***************************************/
/*       Public data structures        */
/***************************************/

/// A call that was just taken by an elevator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimedCall {
    pub call_id: CallId,
    pub pickup: Floor,
    pub destination: Option<Floor>,
}

/**
 * Calls of one building for the duration of a tick.
 *
 * Both the dispatcher and the state machine take calls out of the same book,
 * so a call claimed by one of them is no longer visible to the other. Every
 * call touched during the tick is remembered for persisting.
 *
 * # Fields
 * - `pending`:     Unhandled calls in arrival order.
 * - `boarding`:    Handled calls whose destination was supplied later and not yet routed.
 *                  Unhandled calls with a destination stay in `pending` until claimed.
 * - `modified`:    Ids of calls changed during this tick.
 */
#[derive(Debug, Clone, Default)]
pub struct CallBook {
    pending: Vec<Call>,
    boarding: Vec<Call>,
    modified: BTreeSet<CallId>,
}

impl CallBook {
    pub fn new(mut pending: Vec<Call>, mut boarding: Vec<Call>) -> CallBook {
        pending.retain(|call| !call.is_handled);
        pending.sort_by_key(|call| (call.created_at, call.id));
        boarding.retain(|call| call.is_handled && call.unrouted_destination().is_some());
        boarding.sort_by_key(|call| (call.created_at, call.id));

        CallBook {
            pending,
            boarding,
            modified: BTreeSet::new(),
        }
    }

    /// Ids of calls nobody has taken yet, oldest first.
    pub fn unhandled(&self) -> Vec<(CallId, Floor)> {
        self.pending
            .iter()
            .filter(|call| !call.is_handled)
            .map(|call| (call.id, call.requested_floor))
            .collect()
    }

    pub fn has_unhandled(&self) -> bool {
        self.pending.iter().any(|call| !call.is_handled)
    }

    /// Takes an unhandled call. Returns `None` if it is unknown or already taken.
    pub fn claim(&mut self, call_id: CallId) -> Option<ClaimedCall> {
        let call = self
            .pending
            .iter_mut()
            .find(|call| call.id == call_id)?;

        if !call.mark_handled() {
            return None;
        }
        let destination = call.unrouted_destination();
        if destination.is_some() {
            call.destination_routed = true;
        }
        self.modified.insert(call.id);

        Some(ClaimedCall {
            call_id: call.id,
            pickup: call.requested_floor,
            destination,
        })
    }

    /// Takes every unhandled call strictly beyond `current` in direction `travel`.
    pub fn claim_ahead(&mut self, current: Floor, travel: Travel) -> Vec<ClaimedCall> {
        let ahead: Vec<CallId> = self
            .pending
            .iter()
            .filter(|call| !call.is_handled && travel.is_ahead(current, call.requested_floor))
            .map(|call| call.id)
            .collect();

        ahead
            .into_iter()
            .filter_map(|call_id| self.claim(call_id))
            .collect()
    }

    /**
     * Routes destinations chosen by riders who boarded at `floor`, newest call first.
     *
     * A rider may press the call button at a floor where the doors are already
     * open. Such a call is still unhandled, so it is claimed here along with its
     * destination instead of being left for a later pickup.
     */
    pub fn claim_boarding(&mut self, floor: Floor) -> Vec<ClaimedCall> {
        let walk_ins: Vec<CallId> = self
            .pending
            .iter()
            .rev()
            .filter(|call| {
                !call.is_handled
                    && call.requested_floor == floor
                    && call.unrouted_destination().is_some()
            })
            .map(|call| call.id)
            .collect();

        let mut claimed: Vec<ClaimedCall> = walk_ins
            .into_iter()
            .filter_map(|call_id| self.claim(call_id))
            .collect();

        for call in self.boarding.iter_mut().rev() {
            if call.requested_floor != floor {
                continue;
            }
            if let Some(destination) = call.unrouted_destination() {
                call.destination_routed = true;
                self.modified.insert(call.id);
                claimed.push(ClaimedCall {
                    call_id: call.id,
                    pickup: call.requested_floor,
                    destination: Some(destination),
                });
            }
        }
        claimed
    }

    pub fn modified_calls(&self) -> Vec<Call> {
        self.pending
            .iter()
            .chain(self.boarding.iter())
            .filter(|call| self.modified.contains(&call.id))
            .cloned()
            .collect()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod call_book_tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn call_at(id: CallId, floor: Floor, age_secs: u64) -> Call {
        let mut call = Call::new(id, 1, floor);
        call.created_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1000 - age_secs);
        call
    }

    #[test]
    fn test_unhandled_in_arrival_order() {
        // Purpose: Calls are offered oldest first regardless of load order

        let book = CallBook::new(vec![call_at(2, 4, 10), call_at(1, 7, 20)], Vec::new());

        assert_eq!(book.unhandled(), vec![(1, 7), (2, 4)]);
    }

    #[test]
    fn test_claim_marks_handled_once() {
        let mut book = CallBook::new(vec![call_at(1, 3, 0)], Vec::new());

        let first = book.claim(1);
        let second = book.claim(1);

        assert_eq!(
            first,
            Some(ClaimedCall {
                call_id: 1,
                pickup: 3,
                destination: None
            })
        );
        assert_eq!(second, None);
        assert!(!book.has_unhandled());
        assert_eq!(book.modified_calls().len(), 1);
        assert!(book.modified_calls()[0].is_handled);
    }

    #[test]
    fn test_claim_routes_known_destination() {
        let mut call = call_at(1, 3, 0);
        call.destination_floor = Some(8);
        let mut book = CallBook::new(vec![call], Vec::new());

        let claimed = book.claim(1).unwrap();

        assert_eq!(claimed.destination, Some(8));
        assert!(book.modified_calls()[0].destination_routed);
    }

    #[test]
    fn test_claim_ahead_only_takes_calls_in_direction() {
        let mut book = CallBook::new(
            vec![call_at(1, 2, 3), call_at(2, 6, 2), call_at(3, 4, 1)],
            Vec::new(),
        );

        let claimed = book.claim_ahead(4, Travel::Up);

        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].pickup, 6);
        assert_eq!(book.unhandled(), vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_claim_boarding_routes_each_destination_once() {
        let mut boarded = call_at(1, 0, 5);
        boarded.is_handled = true;
        boarded.destination_floor = Some(3);
        let mut book = CallBook::new(Vec::new(), vec![boarded]);

        let first = book.claim_boarding(0);
        let second = book.claim_boarding(0);

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].destination, Some(3));
        assert!(second.is_empty());
        assert!(book.claim_boarding(1).is_empty());
    }

    #[test]
    fn test_boarding_ignores_routed_calls() {
        let mut routed = call_at(1, 0, 5);
        routed.is_handled = true;
        routed.destination_floor = Some(3);
        routed.destination_routed = true;

        let mut book = CallBook::new(Vec::new(), vec![routed]);

        assert!(book.claim_boarding(0).is_empty());
    }

    #[test]
    fn test_claim_boarding_takes_unhandled_call_with_destination() {
        // Purpose: A rider who called at an open door is claimed once, with their destination

        // Arrange
        let mut walk_in = call_at(1, 0, 4);
        walk_in.destination_floor = Some(6);
        let no_destination = call_at(2, 0, 3);
        let elsewhere = {
            let mut call = call_at(3, 2, 2);
            call.destination_floor = Some(5);
            call
        };
        let mut book = CallBook::new(vec![walk_in, no_destination, elsewhere], Vec::new());

        // Act
        let first = book.claim_boarding(0);
        let second = book.claim_boarding(0);

        // Assert
        assert_eq!(
            first,
            vec![ClaimedCall {
                call_id: 1,
                pickup: 0,
                destination: Some(6)
            }]
        );
        assert!(second.is_empty());
        assert_eq!(book.unhandled(), vec![(2, 0), (3, 2)]);
        assert_eq!(book.claim(1), None);

        let modified = book.modified_calls();
        assert_eq!(modified.len(), 1);
        assert!(modified[0].is_handled);
        assert!(modified[0].destination_routed);
    }

    #[test]
    fn test_claim_ahead_while_moving_down() {
        let mut book = CallBook::new(
            vec![call_at(1, 2, 3), call_at(2, 6, 2), call_at(3, 4, 1)],
            Vec::new(),
        );

        let claimed = book.claim_ahead(4, Travel::Down);

        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].pickup, 2);
        assert_eq!(book.unhandled(), vec![(2, 6), (3, 4)]);
    }
}
