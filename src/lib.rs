/* Modules */
pub mod config;
pub mod console;
pub mod coordinator;
pub mod dispatcher;
pub mod elevator;
pub mod error;
pub mod network;
pub mod shared;
pub mod storage;

/* Public API */
pub use config::Config;
pub use coordinator::{Clock, ManualClock, SystemClock, TickReport, TickScheduler};
pub use dispatcher::Dispatcher;
pub use elevator::{ElevatorFSM, FleetMemory};
pub use network::{ChannelNotifier, ElevatorUpdate, Notifier};
pub use storage::{CallIntake, InMemoryRepository, Repository};
