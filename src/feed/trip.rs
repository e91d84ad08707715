use serde::{Deserialize, Serialize};

/// one visit of a trip at a stop, from stop_times.txt. times are seconds
/// since midnight of the trip's operating day and may exceed 24h for
/// overnight runs. either time may be absent, which marks the row for
/// interpolation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StopTime {
    pub stop_id: String,
    /// ordering key within the trip; values increase but need not be
    /// consecutive
    pub sequence: u32,
    pub arrival: Option<u32>,
    pub departure: Option<u32>,
    /// cumulative distance traveled along the trip's shape, when the feed
    /// provides it
    pub shape_dist_traveled: Option<f32>,
}

/// a headway-based service window from frequencies.txt: the trip repeats
/// every `headway_secs` from `start_time` until (exclusive) `end_time`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct Frequency {
    pub start_time: u32,
    pub end_time: u32,
    pub headway_secs: u32,
}

/// one scheduled vehicle run along a fixed stop sequence, from trips.txt.
/// stop_times are stable-sorted by sequence at feed construction, so every
/// consumer sees the visits in travel order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Trip {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub headsign: Option<String>,
    pub stop_times: Vec<StopTime>,
    pub frequencies: Vec<Frequency>,
}
