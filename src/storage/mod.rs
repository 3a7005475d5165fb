pub mod intake;
pub mod repository;

pub use intake::CallIntake;
pub use repository::{InMemoryRepository, Repository};
