/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::SchedulerConfig;
use crate::coordinator::clock::{Clock, Wake};
use crate::dispatcher::Dispatcher;
use crate::elevator::{ElevatorFSM, FleetMemory};
use crate::error::TickResult;
use crate::network::Notifier;
use crate::shared::{Building, CallBook};
use crate::storage::Repository;

/***************************************/
/*       Public data structures        */
/***************************************/

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub buildings: usize,
    pub assignments: usize,
    pub elevators_saved: usize,
    pub calls_saved: usize,
}

/**
 * Drives the dispatcher and the elevator state machine on a fixed period.
 *
 * Each tick loads every building, dispatches waiting calls, steps every
 * elevator once, persists the changed records in one `save_all` and then
 * publishes a snapshot of every elevator. Ticks never overlap.
 *
 * # Fields
 * - `repository`:  Store for buildings, elevators and calls.
 * - `notifier`:    Receives one snapshot per elevator per tick.
 * - `dispatcher`:  Assigns waiting calls to idle elevators.
 * - `fsm`:         Elevator state machine.
 * - `fleet`:       Destination trackers and door timers; never persisted.
 * - `ticks`:       Number of ticks that were persisted.
 */
pub struct TickScheduler<R: Repository, N: Notifier> {
    repository: R,
    notifier: N,
    dispatcher: Dispatcher,
    fsm: ElevatorFSM,
    fleet: FleetMemory,
    ticks: u64,
}

/***************************************/
/*             Public API              */
/***************************************/
impl<R: Repository, N: Notifier> TickScheduler<R, N> {
    pub fn new(repository: R, notifier: N, config: &SchedulerConfig) -> TickScheduler<R, N> {
        TickScheduler {
            repository,
            notifier,
            dispatcher: Dispatcher::new(),
            fsm: ElevatorFSM::new(config.door_open_ticks),
            fleet: FleetMemory::new(),
            ticks: 0,
        }
    }

    pub fn fleet(&self) -> &FleetMemory {
        &self.fleet
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs ticks until the stop signal fires. A failed tick is logged and skipped.
    pub fn run<C: Clock>(&mut self, clock: &C, stop_rx: &cbc::Receiver<()>) {
        info!(
            "Tick scheduler is starting with a period of {:?}",
            clock.period()
        );

        loop {
            if stop_requested(stop_rx) {
                break;
            }

            match self.tick() {
                Ok(report) => debug!("{:?}", report),
                Err(e) => error!("Tick {} failed: {}", self.ticks + 1, e),
            }

            if clock.wait(stop_rx) == Wake::Stop {
                break;
            }
        }

        info!("Tick scheduler stopped after {} ticks", self.ticks);
    }

    /**
     * Runs a single tick.
     *
     * The tick works on a copy of the fleet memory which replaces the live
     * one only after `save_all` succeeds, so a failed tick leaves no trace.
     */
    pub fn tick(&mut self) -> TickResult<TickReport> {
        let mut buildings = self.repository.load_buildings_with_elevators()?;
        let mut staged = self.fleet.clone();
        let mut modified_elevators = Vec::new();
        let mut modified_calls = Vec::new();
        let mut assignments = 0;

        for building in buildings.iter_mut() {
            let pending = self.repository.load_unhandled_calls(building.id)?;
            let boarding = self.repository.load_pending_destinations(building.id)?;
            let mut calls = CallBook::new(pending, boarding);

            // Dispatch strictly before movement, so a call is taken by at most one of them.
            assignments += self
                .dispatcher
                .dispatch(building, &mut staged, &mut calls)
                .len();

            let floors = building.floors;
            for elevator in building.elevators.iter_mut() {
                let before = elevator.clone();
                let memory = staged.memory_mut(elevator.id);
                self.fsm.step(elevator, memory, floors, &mut calls);
                if *elevator != before {
                    modified_elevators.push(elevator.clone());
                }
            }

            modified_calls.extend(calls.modified_calls());
        }

        if !modified_elevators.is_empty() || !modified_calls.is_empty() {
            self.repository
                .save_all(&modified_elevators, &modified_calls)?;
        }
        self.fleet = staged;
        self.ticks += 1;

        self.publish(&buildings);

        Ok(TickReport {
            tick: self.ticks,
            buildings: buildings.len(),
            assignments,
            elevators_saved: modified_elevators.len(),
            calls_saved: modified_calls.len(),
        })
    }

    fn publish(&self, buildings: &[Building]) {
        for building in buildings {
            for elevator in &building.elevators {
                if let Err(e) = self.notifier.publish(building.id, elevator.snapshot()) {
                    warn!("Failed to publish update for elevator {}: {}", elevator.id, e);
                }
            }
        }
    }
}

fn stop_requested(stop_rx: &cbc::Receiver<()>) -> bool {
    match stop_rx.try_recv() {
        Ok(()) => true,
        Err(cbc::TryRecvError::Disconnected) => true,
        Err(cbc::TryRecvError::Empty) => false,
    }
}
