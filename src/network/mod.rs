pub mod network;

pub use network::{building_channel, ChannelNotifier, ElevatorUpdate, Notifier};
