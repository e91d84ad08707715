use crate::convert::converter::ConversionTables;
use crate::convert::{ConvertConfig, ConvertError};
use crate::feed::Trip;
use crate::model::{Departure, DepartureId, TransitSchedule};

/// emit the departures of one trip for one day of the window. a trip
/// without frequencies yields exactly one departure at its first-stop
/// departure time; a frequency trip yields one departure per headway step,
/// strictly before each window's end time. ids embed the day offset so
/// repeated days never collide.
///
/// the owning route comes from the consolidation map; an unresolvable
/// entry means the pattern registry broke and is therefore fatal.
pub(crate) fn generate_departures(
    schedule: &mut TransitSchedule,
    tables: &mut ConversionTables,
    trip: &Trip,
    origin_departure: Option<u32>,
    day_offset: u32,
    config: &ConvertConfig,
) -> Result<(usize, usize), ConvertError> {
    let (line_id, route_id) = tables
        .consolidated_route(&trip.id)
        .ok_or_else(|| {
            ConvertError::ConsolidationInvariant(format!(
                "trip '{}' has no consolidated route",
                trip.id
            ))
        })?
        .clone();

    let mut departures: Vec<Departure> = vec![];
    let mut scheduled = 0usize;
    let mut frequency = 0usize;

    if trip.frequencies.is_empty() {
        let origin = origin_departure.ok_or_else(|| ConvertError::IncompleteTrip(trip.id.clone()))?;
        let id = DepartureId::new(format!("{}{}_{}", config.prefix, trip.id, day_offset));
        departures.push(Departure::new(id, origin + day_offset));
        scheduled += 1;
    } else {
        for window in &trip.frequencies {
            if window.headway_secs == 0 {
                return Err(ConvertError::MalformedFeed(format!(
                    "frequency window of trip '{}' has zero headway",
                    trip.id
                )));
            }
            let mut t = window.start_time;
            while t < window.end_time {
                let time = t + day_offset;
                let id = DepartureId::new(format!("{}{}.{}", config.prefix, trip.id, time));
                departures.push(Departure::new(id, time));
                frequency += 1;
                t += window.headway_secs;
            }
        }
    }

    for departure in &departures {
        tables.register_departure_id(&departure.id)?;
    }

    let route = schedule
        .line_mut(&line_id)
        .and_then(|line| line.route_mut(&route_id))
        .ok_or_else(|| {
            ConvertError::ConsolidationInvariant(format!(
                "route '{route_id}' of line '{line_id}' vanished after consolidation"
            ))
        })?;
    for departure in departures {
        route.add_departure(departure);
    }

    Ok((scheduled, frequency))
}
