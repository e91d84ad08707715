use serde::{Deserialize, Serialize};

/// a stop-to-stop transfer rule from transfers.txt. only the minimum
/// transfer time is carried; transfer types other than timed transfers
/// contribute no schedule data.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Transfer {
    pub from_stop_id: String,
    pub to_stop_id: String,
    /// minimum time in seconds needed to make the connection
    pub min_transfer_time: Option<u32>,
}
