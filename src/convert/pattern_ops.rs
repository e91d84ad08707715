use crate::convert::converter::ConversionTables;
use crate::convert::{id_ops, ConvertConfig, ConvertError};
use crate::feed::{RouteDef, Trip};
use crate::model::{LineId, RouteId, RouteStop, TransitRoute, TransitSchedule, TransportMode};

/// assign a trip's stop pattern to a route of its line, reusing an
/// existing route on exact sequence match. the lookup runs before every
/// creation, so two element-wise-equal patterns can never coexist on one
/// line. each resolution also records the trip's original route identity
/// against the surviving route in the consolidation map; the departure
/// generator attaches departures through that map only.
pub(crate) fn resolve_route(
    schedule: &mut TransitSchedule,
    tables: &mut ConversionTables,
    trip: &Trip,
    route: &RouteDef,
    stops: Vec<RouteStop>,
    config: &ConvertConfig,
) -> Result<(LineId, RouteId), ConvertError> {
    let line_id = id_ops::line_id(&config.prefix, route);
    let line = schedule.line_mut(&line_id).ok_or_else(|| {
        ConvertError::ConsolidationInvariant(format!(
            "line '{}' of trip '{}' was never registered",
            line_id, trip.id
        ))
    })?;

    if let Some(existing) = line.find_matching_route(&stops) {
        let route_id = existing.id.clone();
        tables.record_consolidation(&trip.id, line_id.clone(), route_id.clone());
        return Ok((line_id, route_id));
    }

    let mode = TransportMode::from_code(route.route_type).ok_or_else(|| {
        ConvertError::UnknownRouteType {
            route_id: route.id.clone(),
            code: route.route_type,
        }
    })?;

    // line id already carries the prefix, no second prefix needed here
    let route_id = RouteId::new(format!("{}_{}", line_id, line.route_count()));
    let label = mode.label(config.use_extended_route_types).to_string();
    line.add_route(TransitRoute::new(route_id.clone(), label, stops));
    tables.record_consolidation(&trip.id, line_id.clone(), route_id.clone());
    Ok((line_id, route_id))
}
