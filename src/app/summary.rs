use serde::{Deserialize, Serialize};

use crate::model::TransitSchedule;

/// headline counts of an assembled schedule, printed as JSON by the
/// summary operation.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ScheduleSummary {
    pub start_date: String,
    pub end_date: String,
    pub lines: usize,
    pub routes: usize,
    pub departures: usize,
    pub facilities: usize,
    pub transfer_pairs: usize,
}

impl ScheduleSummary {
    pub fn of(schedule: &TransitSchedule) -> ScheduleSummary {
        ScheduleSummary {
            start_date: schedule.start_date.to_string(),
            end_date: schedule.end_date.to_string(),
            lines: schedule.line_count(),
            routes: schedule.route_count(),
            departures: schedule.departure_count(),
            facilities: schedule.facility_count(),
            transfer_pairs: schedule.min_transfer_times().count(),
        }
    }
}
