use geo::Point;
use serde::Serialize;

use crate::model::{FacilityId, StopAreaId};

/// a physical boarding location in the output schedule. created once per
/// distinct facility id; under a stop-merge policy several GTFS stops
/// resolve to the same facility.
#[derive(Serialize, Clone, Debug)]
pub struct StopFacility {
    pub id: FacilityId,
    /// display name, cleaned of control characters
    pub name: String,
    /// location in the configured target coordinate system
    pub coord: Point<f64>,
    /// containing station, when the source stop referenced a parent
    pub stop_area: Option<StopAreaId>,
}

impl StopFacility {
    pub fn new(id: FacilityId, name: String, coord: Point<f64>) -> StopFacility {
        StopFacility {
            id,
            name,
            coord,
            stop_area: None,
        }
    }
}
