use serde::Serialize;

use crate::model::{LineId, RouteId, RouteStop, TransitRoute};

/// a branded transit line derived from one GTFS route, owning the distinct
/// stop patterns (TransitRoutes) its trips fold into. the provenance
/// attributes carry the source route's identity for downstream consumers.
#[derive(Serialize, Clone, Debug)]
pub struct TransitLine {
    pub id: LineId,
    /// rider-facing name: the route short name, or the raw route id when
    /// the feed has none
    pub name: String,
    /// the name reduced to ASCII, as used inside the line id
    pub ascii_short_name: String,
    pub agency_id: Option<String>,
    /// raw GTFS route_type code of the source route
    pub route_type: i32,
    routes: Vec<TransitRoute>,
}

impl TransitLine {
    pub fn new(
        id: LineId,
        name: String,
        ascii_short_name: String,
        agency_id: Option<String>,
        route_type: i32,
    ) -> TransitLine {
        TransitLine {
            id,
            name,
            ascii_short_name,
            agency_id,
            route_type,
            routes: vec![],
        }
    }

    pub fn routes(&self) -> &[TransitRoute] {
        &self.routes
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn route_mut(&mut self, id: &RouteId) -> Option<&mut TransitRoute> {
        self.routes.iter_mut().find(|r| &r.id == id)
    }

    /// the registered route whose stop sequence is element-wise equal to
    /// the candidate, if one exists. route creation must consult this
    /// before registering a new pattern.
    pub fn find_matching_route(&self, stops: &[RouteStop]) -> Option<&TransitRoute> {
        self.routes.iter().find(|r| r.stops() == stops)
    }

    pub fn add_route(&mut self, route: TransitRoute) {
        self.routes.push(route);
    }
}
