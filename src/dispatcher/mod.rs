pub mod dispatcher;

pub use dispatcher::{Assignment, Dispatcher};
