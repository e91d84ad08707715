use serde::Serialize;

use crate::model::{Departure, FacilityId, RouteId};

/// one stop visit within a route pattern. offsets are seconds relative to
/// the pattern's first recorded departure, so the first stop's departure
/// offset is 0 by construction.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RouteStop {
    pub facility: FacilityId,
    pub arrival_offset: i32,
    pub departure_offset: i32,
    /// a scheduled vehicle never leaves a stop ahead of its timetable
    pub await_departure: bool,
}

/// a concrete stop pattern of a transit line, plus the departures that run
/// it. the stop sequence is fixed at creation; two routes of the same line
/// never carry element-wise equal sequences.
#[derive(Serialize, Clone, Debug)]
pub struct TransitRoute {
    pub id: RouteId,
    /// transport mode label derived from the GTFS route type
    pub mode: String,
    stops: Vec<RouteStop>,
    departures: Vec<Departure>,
}

impl TransitRoute {
    pub fn new(id: RouteId, mode: String, stops: Vec<RouteStop>) -> TransitRoute {
        TransitRoute {
            id,
            mode,
            stops,
            departures: vec![],
        }
    }

    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    pub fn add_departure(&mut self, departure: Departure) {
        self.departures.push(departure);
    }
}
