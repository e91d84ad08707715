use serde::Serialize;

use crate::model::DepartureId;

/// one concrete departure of a route pattern. the time is in seconds from
/// midnight of the conversion window's first day and may exceed 86400, both
/// for overnight runs and for departures placed on later days of a
/// multi-day window.
#[derive(Serialize, Clone, Debug)]
pub struct Departure {
    pub id: DepartureId,
    pub time: u32,
    /// vehicle assignment is left to downstream fleet tooling
    pub vehicle_id: Option<String>,
}

impl Departure {
    pub fn new(id: DepartureId, time: u32) -> Departure {
        Departure {
            id,
            time,
            vehicle_id: None,
        }
    }
}
