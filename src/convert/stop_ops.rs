use std::collections::{BTreeSet, HashMap};

use geo::Point;
use itertools::Itertools;

use crate::convert::converter::ConversionTables;
use crate::convert::{id_ops, ConvertConfig, ConvertError, StopMergePolicy};
use crate::feed::Feed;
use crate::model::{FacilityId, StopAreaId, StopFacility, TransitSchedule};

/// create the stop facilities of the schedule and the per-run alias table
/// recording every stop id that a merge policy folded away. runs once,
/// before any trip is processed; the alias table is read-only afterwards.
pub(crate) fn convert_stops(
    feed: &Feed,
    config: &ConvertConfig,
    schedule: &mut TransitSchedule,
    tables: &mut ConversionTables,
) -> Result<(), ConvertError> {
    let composite_ids = match config.merge_policy {
        StopMergePolicy::MergeToParentAndRouteTypes => Some(composite_station_ids(feed)),
        _ => None,
    };

    let mut coord_index: HashMap<(i64, i64), FacilityId> = HashMap::new();

    for stop in feed.stops.values() {
        if !config.include_stop(stop) {
            log::debug!("stop '{}' excluded by stop filter", stop.id);
            continue;
        }

        let parent = stop
            .parent_station
            .as_ref()
            .and_then(|p| feed.stops.get(p));
        let (lon, lat) = stop
            .location(parent)
            .ok_or_else(|| ConvertError::MissingStopLocation(stop.id.clone()))?;
        let coord = config.transform_point(Point::new(lon, lat));
        let key = coord_key(&coord);

        let mut id = id_ops::facility_id(&config.prefix, &stop.id);

        match config.merge_policy {
            StopMergePolicy::DoNotMerge => {}
            StopMergePolicy::MergeAtSameCoordinate => {
                // the first stop seen at this coordinate owns the facility
                if let Some(existing) = coord_index.get(&key) {
                    tables.alias_stop(&stop.id, existing.clone());
                    continue;
                }
            }
            StopMergePolicy::MergeToParentStation => {
                if let Some(parent_id) =
                    stop.parent_station.as_deref().filter(|p| !p.is_empty())
                {
                    tables.alias_stop(&stop.id, id_ops::facility_id(&config.prefix, parent_id));
                    continue;
                }
            }
            StopMergePolicy::MergeToParentAndRouteTypes => {
                if let Some(composite) =
                    composite_ids.as_ref().and_then(|m| m.get(&stop.id))
                {
                    id = id_ops::facility_id(&config.prefix, composite);
                    tables.alias_stop(&stop.id, id.clone());
                    if schedule.facility(&id).is_some() {
                        continue;
                    }
                }
            }
        }

        let mut facility = StopFacility::new(id.clone(), id_ops::display_name(stop), coord);
        if let Some(parent_id) = stop.parent_station.as_deref().filter(|p| !p.is_empty()) {
            facility.stop_area = Some(StopAreaId::new(parent_id));
        }
        schedule.add_facility(facility);
        coord_index.entry(key).or_insert(id);
    }

    Ok(())
}

/// composite facility ids for the parent+route-types policy: scan every
/// trip's stop sequence to learn which route types serve each stop, then
/// key stops with a parent as "<parent>_<sorted type codes>". stops without
/// a parent are absent from the result and keep their own id.
fn composite_station_ids(feed: &Feed) -> HashMap<String, String> {
    let mut types_by_stop: HashMap<&str, BTreeSet<i32>> = HashMap::new();
    for trip in feed.trips.values() {
        if let Some(route) = feed.routes.get(&trip.route_id) {
            for stop_time in &trip.stop_times {
                types_by_stop
                    .entry(stop_time.stop_id.as_str())
                    .or_default()
                    .insert(route.route_type);
            }
        }
    }

    feed.stops
        .values()
        .filter_map(|stop| {
            let parent = stop.parent_station.as_deref().filter(|p| !p.is_empty())?;
            let codes = types_by_stop
                .get(stop.id.as_str())
                .map(|codes| codes.iter().map(|c| c.to_string()).join("_"))
                .unwrap_or_default();
            Some((stop.id.clone(), format!("{parent}_{codes}")))
        })
        .collect()
}

/// merge key for coordinate-based stop folding: the transformed coordinate
/// rounded to 1e-6 of a unit.
fn coord_key(coord: &Point<f64>) -> (i64, i64) {
    (
        (coord.x() * 1e6).round() as i64,
        (coord.y() * 1e6).round() as i64,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feed::{RouteDef, Stop, StopTime, Trip};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn stop(id: &str, lon: f64, lat: f64, parent: Option<&str>) -> (String, Stop) {
        (
            String::from(id),
            Stop {
                id: String::from(id),
                name: Some(format!("{id} name")),
                longitude: Some(lon),
                latitude: Some(lat),
                parent_station: parent.map(String::from),
            },
        )
    }

    fn test_feed() -> Feed {
        Feed {
            stops: BTreeMap::from([
                stop("P1", -105.0, 40.0, None),
                stop("S1", -105.0, 40.0001, Some("P1")),
                stop("S2", -105.0, 40.0001, Some("P1")),
                stop("S3", -105.1, 40.1, None),
            ]),
            routes: BTreeMap::from([
                (
                    String::from("R1"),
                    RouteDef {
                        id: String::from("R1"),
                        short_name: Some(String::from("10")),
                        agency_id: None,
                        route_type: 3,
                    },
                ),
                (
                    String::from("R2"),
                    RouteDef {
                        id: String::from("R2"),
                        short_name: Some(String::from("T")),
                        agency_id: None,
                        route_type: 0,
                    },
                ),
            ]),
            trips: BTreeMap::from([
                (
                    String::from("T1"),
                    Trip {
                        id: String::from("T1"),
                        route_id: String::from("R1"),
                        service_id: String::from("WK"),
                        headsign: None,
                        stop_times: vec![
                            StopTime {
                                stop_id: String::from("S1"),
                                sequence: 1,
                                arrival: Some(0),
                                departure: Some(0),
                                shape_dist_traveled: None,
                            },
                            StopTime {
                                stop_id: String::from("S3"),
                                sequence: 2,
                                arrival: Some(600),
                                departure: Some(600),
                                shape_dist_traveled: None,
                            },
                        ],
                        frequencies: vec![],
                    },
                ),
                (
                    String::from("T2"),
                    Trip {
                        id: String::from("T2"),
                        route_id: String::from("R2"),
                        service_id: String::from("WK"),
                        headsign: None,
                        stop_times: vec![StopTime {
                            stop_id: String::from("S2"),
                            sequence: 1,
                            arrival: Some(0),
                            departure: Some(0),
                            shape_dist_traveled: None,
                        }],
                        frequencies: vec![],
                    },
                ),
            ]),
            services: BTreeMap::new(),
            transfers: vec![],
        }
    }

    fn run(policy: StopMergePolicy) -> (TransitSchedule, ConversionTables) {
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date).with_merge_policy(policy);
        let mut schedule = TransitSchedule::new(date, date);
        let mut tables = ConversionTables::default();
        convert_stops(&test_feed(), &config, &mut schedule, &mut tables)
            .expect("stop conversion should succeed");
        (schedule, tables)
    }

    #[test]
    fn test_do_not_merge_keeps_every_stop() {
        let (schedule, _) = run(StopMergePolicy::DoNotMerge);
        assert_eq!(schedule.facility_count(), 4);
    }

    #[test]
    fn test_same_coordinate_stops_fold_into_first() {
        let (schedule, tables) = run(StopMergePolicy::MergeAtSameCoordinate);
        // S1 and S2 share a coordinate; S2 aliases to S1's facility
        assert_eq!(schedule.facility_count(), 3);
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date)
            .with_merge_policy(StopMergePolicy::MergeAtSameCoordinate);
        assert_eq!(
            tables.facility_for_stop(&config, "S2"),
            tables.facility_for_stop(&config, "S1")
        );
    }

    #[test]
    fn test_parent_station_merge_counts_parents() {
        let (schedule, _) = run(StopMergePolicy::MergeToParentStation);
        // S1, S2 fold into P1; P1 and S3 remain
        assert_eq!(schedule.facility_count(), 2);
    }

    #[test]
    fn test_parent_and_route_types_builds_composite_ids() {
        let (schedule, tables) = run(StopMergePolicy::MergeToParentAndRouteTypes);
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date)
            .with_merge_policy(StopMergePolicy::MergeToParentAndRouteTypes);
        // S1 is served by route type 3, S2 by route type 0
        assert_eq!(tables.facility_for_stop(&config, "S1").as_str(), "P1_3");
        assert_eq!(tables.facility_for_stop(&config, "S2").as_str(), "P1_0");
        // P1 and S3 keep their own ids, composites add two more
        assert_eq!(schedule.facility_count(), 4);
    }

    #[test]
    fn test_stop_filter_excludes_facility() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date)
            .with_stop_filter(Box::new(|stop: &Stop| stop.id != "S3"));
        let mut schedule = TransitSchedule::new(date, date);
        let mut tables = ConversionTables::default();
        convert_stops(&test_feed(), &config, &mut schedule, &mut tables)
            .expect("stop conversion should succeed");
        assert_eq!(schedule.facility_count(), 3);
        assert!(schedule
            .facility(&crate::model::FacilityId::new("S3"))
            .is_none());
    }
}
