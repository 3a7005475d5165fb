pub mod destinations;
pub mod fsm;

pub use destinations::{DestinationTracker, DoorTimer, ElevatorMemory, FleetMemory};
pub use fsm::ElevatorFSM;
