mod departure;
mod ids;
mod stop_facility;
mod transit_line;
mod transit_route;
mod transit_schedule;
mod transport_mode;

pub use departure::Departure;
pub use ids::{DepartureId, FacilityId, LineId, RouteId, StopAreaId};
pub use stop_facility::StopFacility;
pub use transit_line::TransitLine;
pub use transit_route::{RouteStop, TransitRoute};
pub use transit_schedule::TransitSchedule;
pub use transport_mode::TransportMode;
