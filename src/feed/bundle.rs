use std::collections::BTreeMap;

use itertools::Itertools;

use crate::feed::{
    Frequency, RouteDef, Service, ServiceException, Stop, StopTime, Transfer, Trip, Weekly,
};

/// an immutable, in-memory GTFS dataset, reduced to the tables the schedule
/// assembly consumes. parsing of the raw archive is entirely delegated to
/// the gtfs-structures crate; this type rehosts its object model into owned
/// tables with deterministic iteration order.
#[derive(Debug, Default)]
pub struct Feed {
    pub stops: BTreeMap<String, Stop>,
    pub routes: BTreeMap<String, RouteDef>,
    pub trips: BTreeMap<String, Trip>,
    /// calendar.txt and calendar_dates.txt merged per service id
    pub services: BTreeMap<String, Service>,
    pub transfers: Vec<Transfer>,
}

impl Feed {
    /// read a GTFS archive (zip file or extracted directory) through the
    /// gtfs-structures loader.
    pub fn open(path: &str) -> Result<Feed, gtfs_structures::Error> {
        let gtfs = gtfs_structures::Gtfs::new(path)?;
        Ok(Feed::from_bundle(&gtfs))
    }

    /// rehost a parsed gtfs-structures bundle into feed tables.
    pub fn from_bundle(gtfs: &gtfs_structures::Gtfs) -> Feed {
        let stops: BTreeMap<String, Stop> = gtfs
            .stops
            .iter()
            .map(|(id, stop)| {
                (
                    id.clone(),
                    Stop {
                        id: stop.id.clone(),
                        name: stop.name.clone(),
                        longitude: stop.longitude,
                        latitude: stop.latitude,
                        parent_station: stop.parent_station.clone(),
                    },
                )
            })
            .collect();

        let routes: BTreeMap<String, RouteDef> = gtfs
            .routes
            .iter()
            .map(|(id, route)| {
                (
                    id.clone(),
                    RouteDef {
                        id: route.id.clone(),
                        short_name: route.short_name.clone(),
                        agency_id: route.agency_id.clone(),
                        route_type: route_type_code(&route.route_type),
                    },
                )
            })
            .collect();

        let trips: BTreeMap<String, Trip> = gtfs
            .trips
            .iter()
            .map(|(id, trip)| (id.clone(), convert_trip(trip)))
            .collect();

        let services = convert_services(gtfs);

        // gtfs-structures attaches transfers.txt rows to their origin stop;
        // flatten them back into one table, in stop-id order so that two
        // loads of the same archive yield the same sequence.
        let transfers: Vec<Transfer> = gtfs
            .stops
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .flat_map(|(stop_id, stop)| {
                stop.transfers.iter().map(|t| Transfer {
                    from_stop_id: stop_id.clone(),
                    to_stop_id: t.to_stop_id.clone(),
                    min_transfer_time: t.min_transfer_time,
                })
            })
            .collect();

        Feed {
            stops,
            routes,
            trips,
            services,
            transfers,
        }
    }
}

/// sort each trip's visits by stop_sequence up front. downstream processing
/// folds over a trip's visits in one pass and relies on this ordering; the
/// sort is stable so equal sequence values keep their file order.
fn convert_trip(trip: &gtfs_structures::Trip) -> Trip {
    let mut stop_times: Vec<StopTime> = trip
        .stop_times
        .iter()
        .map(|st| StopTime {
            stop_id: st.stop.id.clone(),
            sequence: st.stop_sequence,
            arrival: st.arrival_time,
            departure: st.departure_time,
            shape_dist_traveled: st.shape_dist_traveled,
        })
        .collect();
    stop_times.sort_by_key(|st| st.sequence);

    let frequencies: Vec<Frequency> = trip
        .frequencies
        .iter()
        .map(|f| Frequency {
            start_time: f.start_time,
            end_time: f.end_time,
            headway_secs: f.headway_secs,
        })
        .collect();

    Trip {
        id: trip.id.clone(),
        route_id: trip.route_id.clone(),
        service_id: trip.service_id.clone(),
        headsign: trip.trip_headsign.clone(),
        stop_times,
        frequencies,
    }
}

/// merge calendar.txt and calendar_dates.txt into one service table. a
/// service id that only appears in calendar_dates.txt gets a service with
/// no weekly part, active exactly on its added dates.
fn convert_services(gtfs: &gtfs_structures::Gtfs) -> BTreeMap<String, Service> {
    let mut services: BTreeMap<String, Service> = gtfs
        .calendar
        .iter()
        .map(|(id, c)| {
            (
                id.clone(),
                Service {
                    id: c.id.clone(),
                    weekly: Some(Weekly {
                        monday: c.monday,
                        tuesday: c.tuesday,
                        wednesday: c.wednesday,
                        thursday: c.thursday,
                        friday: c.friday,
                        saturday: c.saturday,
                        sunday: c.sunday,
                        start_date: c.start_date,
                        end_date: c.end_date,
                    }),
                    exceptions: BTreeMap::new(),
                },
            )
        })
        .collect();

    for (service_id, dates) in &gtfs.calendar_dates {
        let service = services.entry(service_id.clone()).or_insert_with(|| Service {
            id: service_id.clone(),
            weekly: None,
            exceptions: BTreeMap::new(),
        });
        for cd in dates {
            let exception = match cd.exception_type {
                gtfs_structures::Exception::Added => ServiceException::Added,
                gtfs_structures::Exception::Deleted => ServiceException::Removed,
            };
            service.exceptions.insert(cd.date, exception);
        }
    }

    services
}

/// numeric GTFS route_type code behind the loader's enum, extended codes
/// included.
fn route_type_code(route_type: &gtfs_structures::RouteType) -> i32 {
    use gtfs_structures::RouteType;
    match route_type {
        RouteType::Tramway => 0,
        RouteType::Subway => 1,
        RouteType::Rail => 2,
        RouteType::Bus => 3,
        RouteType::Ferry => 4,
        RouteType::CableCar => 5,
        RouteType::Gondola => 6,
        RouteType::Funicular => 7,
        RouteType::Coach => 200,
        RouteType::Air => 1100,
        RouteType::Taxi => 1500,
        RouteType::Other(code) => (*code).into(),
    }
}
