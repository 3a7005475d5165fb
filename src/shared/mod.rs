pub mod call_book;
pub mod macros;
pub mod structs;

pub use call_book::CallBook;
pub use call_book::ClaimedCall;
pub use structs::Building;
pub use structs::BuildingId;
pub use structs::Call;
pub use structs::CallId;
pub use structs::Direction;
pub use structs::DoorStatus;
pub use structs::Elevator;
pub use structs::ElevatorId;
pub use structs::ElevatorSnapshot;
pub use structs::ElevatorStatus;
pub use structs::Floor;
pub use structs::Phase;
pub use structs::Travel;
