use serde::{Deserialize, Serialize};

/// a GTFS route from routes.txt. this is the source-side notion of a route
/// (a branded line riders recognize); the schedule-side TransitRoute is a
/// concrete stop pattern derived from the trips that reference it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RouteDef {
    pub id: String,
    /// short rider-facing identifier like "32" or "Green"; conditionally
    /// required by the GTFS specification, so it may be absent
    pub short_name: Option<String>,
    pub agency_id: Option<String>,
    /// raw GTFS route_type code, including extended codes (e.g. 700-series
    /// bus services)
    pub route_type: i32,
}
