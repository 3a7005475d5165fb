use crossbeam_channel as cbc;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::shared::{BuildingId, ElevatorSnapshot};

/**
 * Publishes elevator state to subscribers of a building.
 *
 * Delivery is best effort. Updates for one elevator are published in tick
 * order and must reach subscribers in that order.
 */
pub trait Notifier {
    fn publish(&self, building_id: BuildingId, snapshot: ElevatorSnapshot)
        -> Result<(), NotifyError>;
}

/// One elevator update addressed to a building channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorUpdate {
    pub building_id: BuildingId,
    pub channel: String,
    pub elevator: ElevatorSnapshot,
}

pub fn building_channel(building_id: BuildingId) -> String {
    format!("building-{}", building_id)
}

/**
 * Notifier that forwards every update over a crossbeam channel.
 *
 * # Fields
 * - `update_tx`:   Sender for elevator updates; the receiving side fans them out.
 */
#[derive(Clone)]
pub struct ChannelNotifier {
    update_tx: cbc::Sender<ElevatorUpdate>,
}

impl ChannelNotifier {
    pub fn new() -> (ChannelNotifier, cbc::Receiver<ElevatorUpdate>) {
        let (update_tx, update_rx) = cbc::unbounded::<ElevatorUpdate>();
        (ChannelNotifier { update_tx }, update_rx)
    }
}

impl Notifier for ChannelNotifier {
    fn publish(
        &self,
        building_id: BuildingId,
        snapshot: ElevatorSnapshot,
    ) -> Result<(), NotifyError> {
        let channel = building_channel(building_id);
        self.update_tx
            .send(ElevatorUpdate {
                building_id,
                channel: channel.clone(),
                elevator: snapshot,
            })
            .map_err(|_| NotifyError::Disconnected(channel))
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
