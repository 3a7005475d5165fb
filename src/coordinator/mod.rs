pub mod clock;
pub mod coordinator;

pub use clock::{Clock, ManualClock, SystemClock, Wake};
pub use coordinator::{TickReport, TickScheduler};
