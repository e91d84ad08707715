use geo::Point;

use crate::convert::converter::ConversionTables;
use crate::convert::distance_policy::compute_haversine;
use crate::convert::{ConvertConfig, ConvertError, DistancePolicy};
use crate::feed::{Feed, Trip};
use crate::model::{RouteStop, TransitSchedule};

/// a trip's stop pattern prepared for route registration: the visit
/// sequence with offsets relative to the trip's first recorded departure,
/// plus that departure itself as the trip's time origin.
pub(crate) struct TripStops {
    /// absolute first departure in seconds; None only for frequency trips
    /// without stop-time rows
    pub origin_departure: Option<u32>,
    pub stops: Vec<RouteStop>,
}

/// build the ordered RouteStop sequence for one trip. missing times are
/// interpolated here, at the point of first use, so failures name the trip
/// that caused them. stops whose facility was filtered out are skipped and
/// the sequence keeps a gap there.
pub(crate) fn build_route_stops(
    trip: &Trip,
    feed: &Feed,
    schedule: &TransitSchedule,
    tables: &ConversionTables,
    config: &ConvertConfig,
) -> Result<TripStops, ConvertError> {
    if trip.stop_times.is_empty() {
        if trip.frequencies.is_empty() {
            return Err(ConvertError::IncompleteTrip(trip.id.clone()));
        }
        log::warn!(
            "frequency trip '{}' has no stop times; registering an empty pattern",
            trip.id
        );
        return Ok(TripStops {
            origin_departure: None,
            stops: vec![],
        });
    }

    let times = resolve_times(trip, feed, config)?;
    let origin = times[0].1;

    let mut stops: Vec<RouteStop> = Vec::with_capacity(trip.stop_times.len());
    for (stop_time, (arrival, departure)) in trip.stop_times.iter().zip(times) {
        let facility = tables.facility_for_stop(config, &stop_time.stop_id);
        if schedule.facility(&facility).is_none() {
            log::debug!(
                "stop '{}' of trip '{}' was filtered; leaving a gap",
                stop_time.stop_id,
                trip.id
            );
            continue;
        }
        stops.push(RouteStop {
            facility,
            arrival_offset: (arrival as i64 - origin as i64) as i32,
            departure_offset: (departure as i64 - origin as i64) as i32,
            await_departure: true,
        });
    }

    Ok(TripStops {
        origin_departure: Some(origin),
        stops,
    })
}

/// resolve one (arrival, departure) pair per stop-time row. a row missing
/// one of the two copies the known value (zero dwell); rows missing both
/// are filled by linear interpolation over cumulative distance between the
/// nearest timed rows on either side. the first and last row must be timed
/// or the trip cannot be anchored.
fn resolve_times(
    trip: &Trip,
    feed: &Feed,
    config: &ConvertConfig,
) -> Result<Vec<(u32, u32)>, ConvertError> {
    let mut filled: Vec<Option<(u32, u32)>> = trip
        .stop_times
        .iter()
        .map(|st| match (st.arrival, st.departure) {
            (Some(arrival), Some(departure)) => Some((arrival, departure)),
            (Some(arrival), None) => Some((arrival, arrival)),
            (None, Some(departure)) => Some((departure, departure)),
            (None, None) => None,
        })
        .collect();

    let first_timed = filled.first().map(|t| t.is_some()).unwrap_or(false);
    let last_timed = filled.last().map(|t| t.is_some()).unwrap_or(false);
    if !first_timed || !last_timed {
        return Err(ConvertError::UnboundedInterpolation(trip.id.clone()));
    }

    // anchor rows with known times; interpolate every gap between
    // consecutive anchors
    let anchors: Vec<(usize, (u32, u32))> = filled
        .iter()
        .enumerate()
        .filter_map(|(index, times)| times.map(|t| (index, t)))
        .collect();

    for pair in anchors.windows(2) {
        let (from_index, from_times) = pair[0];
        let (to_index, to_times) = pair[1];
        if to_index == from_index + 1 {
            continue;
        }
        let span = to_times.0 as f64 - from_times.1 as f64;
        let fractions = distance_fractions(trip, feed, config, from_index, to_index)?;
        for (index, fraction) in (from_index + 1..to_index).zip(fractions) {
            let time = (from_times.1 as f64 + span * fraction).round().max(0.0) as u32;
            filled[index] = Some((time, time));
        }
    }

    filled
        .into_iter()
        .map(|t| {
            t.ok_or_else(|| {
                ConvertError::Other(format!(
                    "interpolation left an unresolved stop time on trip '{}'",
                    trip.id
                ))
            })
        })
        .collect()
}

/// cumulative distance fractions of the intermediate rows in
/// (from_index, to_index), measured along the chain of stops from one
/// anchor to the other. zero-length chains fall back to even spacing by
/// row count.
fn distance_fractions(
    trip: &Trip,
    feed: &Feed,
    config: &ConvertConfig,
    from_index: usize,
    to_index: usize,
) -> Result<Vec<f64>, ConvertError> {
    let rows = &trip.stop_times[from_index..=to_index];

    let shape_distances: Option<Vec<f64>> = rows
        .iter()
        .map(|st| st.shape_dist_traveled.map(|d| d as f64))
        .collect();

    let segments: Vec<f64> = match (config.distance_policy, shape_distances) {
        (DistancePolicy::ShapeDistance, None) => {
            return Err(ConvertError::MalformedFeed(format!(
                "trip '{}' lacks shape_dist_traveled required by the shape-distance policy",
                trip.id
            )))
        }
        (DistancePolicy::ShapeDistance, Some(cumulative))
        | (DistancePolicy::Fallback, Some(cumulative)) => cumulative
            .windows(2)
            .map(|w| (w[1] - w[0]).max(0.0))
            .collect(),
        (DistancePolicy::Haversine, _) | (DistancePolicy::Fallback, None) => {
            let points = rows
                .iter()
                .map(|st| stop_point(feed, &st.stop_id))
                .collect::<Result<Vec<Point<f64>>, ConvertError>>()?;
            points
                .windows(2)
                .map(|w| compute_haversine(w[0], w[1]).get::<uom::si::length::meter>())
                .collect()
        }
    };

    let total: f64 = segments.iter().sum();
    let intermediate = to_index - from_index - 1;
    if total <= f64::EPSILON {
        // all stops in one place; spread the time evenly by row count
        let count = (to_index - from_index) as f64;
        return Ok((1..=intermediate).map(|k| k as f64 / count).collect());
    }

    let mut fractions = Vec::with_capacity(intermediate);
    let mut cumulative = 0.0;
    for segment in segments.iter().take(intermediate) {
        cumulative += segment;
        fractions.push(cumulative / total);
    }
    Ok(fractions)
}

/// raw lon,lat of a stop referenced by a stop time, with parent-station
/// fallback. interpolation needs real geometry, so a stop with no usable
/// location is an input error here.
fn stop_point(feed: &Feed, stop_id: &str) -> Result<Point<f64>, ConvertError> {
    let stop = feed
        .stops
        .get(stop_id)
        .ok_or_else(|| ConvertError::MalformedFeed(format!("unknown stop id '{stop_id}'")))?;
    let parent = stop
        .parent_station
        .as_ref()
        .and_then(|p| feed.stops.get(p));
    let (lon, lat) = stop
        .location(parent)
        .ok_or_else(|| ConvertError::MissingStopLocation(stop_id.to_string()))?;
    Ok(Point::new(lon, lat))
}
