use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::convert::{
    calendar_ops, departure_ops, id_ops, pattern_ops, stop_ops, stop_time_ops, ConvertConfig,
    ConvertError, StopMergePolicy,
};
use crate::feed::{Feed, RouteDef, Trip};
use crate::model::{DepartureId, FacilityId, LineId, RouteId, TransitLine, TransitSchedule};

/// the mutable lookup state of one conversion run: which stop ids were
/// merged away, which route a trip's pattern survived as, and which
/// departure ids are taken. owned by the converter and threaded through
/// the pipeline stages; there is no global state.
#[derive(Default)]
pub struct ConversionTables {
    stop_aliases: HashMap<String, FacilityId>,
    consolidation: HashMap<String, (LineId, RouteId)>,
    departure_ids: HashSet<DepartureId>,
}

impl ConversionTables {
    /// record that a stop id was merged into a facility. the first writer
    /// wins; re-recording an already-aliased stop is a no-op.
    pub(crate) fn alias_stop(&mut self, stop_id: &str, facility: FacilityId) {
        self.stop_aliases
            .entry(stop_id.to_string())
            .or_insert(facility);
    }

    /// the output facility a stop time resolves to. stops the merge policy
    /// folded away resolve through the alias table, everything else maps
    /// straight to its prefixed id.
    pub fn facility_for_stop(&self, config: &ConvertConfig, stop_id: &str) -> FacilityId {
        if config.merge_policy == StopMergePolicy::DoNotMerge {
            return id_ops::facility_id(&config.prefix, stop_id);
        }
        match self.stop_aliases.get(stop_id) {
            Some(facility) => facility.clone(),
            None => id_ops::facility_id(&config.prefix, stop_id),
        }
    }

    /// record the surviving route of a trip's original route identity.
    /// first writer wins, so repeated resolution across days stays stable.
    pub(crate) fn record_consolidation(
        &mut self,
        trip_id: &str,
        line_id: LineId,
        route_id: RouteId,
    ) {
        self.consolidation
            .entry(trip_id.to_string())
            .or_insert((line_id, route_id));
    }

    pub fn consolidated_route(&self, trip_id: &str) -> Option<&(LineId, RouteId)> {
        self.consolidation.get(trip_id)
    }

    pub(crate) fn register_departure_id(&mut self, id: &DepartureId) -> Result<(), ConvertError> {
        if !self.departure_ids.insert(id.clone()) {
            return Err(ConvertError::DuplicateDeparture(id.as_str().to_string()));
        }
        Ok(())
    }
}

/// assembles a transit schedule from an in-memory feed, one calendar day
/// at a time. lines and route patterns are created lazily and shared
/// across days; departures multiply per day, shifted by 24h each.
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Result<Converter, ConvertError> {
        if config.start_date > config.end_date {
            return Err(ConvertError::InvalidWindow(
                config.start_date,
                config.end_date,
            ));
        }
        Ok(Converter { config })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// run the whole pipeline: facilities and transfer times first, then
    /// one independent pass per day of the window.
    pub fn convert(&self, feed: &Feed) -> Result<TransitSchedule, ConvertError> {
        let mut schedule = TransitSchedule::new(self.config.start_date, self.config.end_date);
        let mut tables = ConversionTables::default();

        stop_ops::convert_stops(feed, &self.config, &mut schedule, &mut tables)?;
        if self.config.include_minimal_transfer_times {
            self.convert_transfer_times(feed, &tables, &mut schedule);
        }
        self.log_feed_span(feed);

        let mut date = self.config.start_date;
        let mut day_index: u32 = 0;
        while date <= self.config.end_date {
            let day_offset = day_index * 24 * 3600;
            self.convert_day(feed, date, day_offset, &mut schedule, &mut tables)?;
            date = date.succ_opt().ok_or_else(|| {
                ConvertError::Other(format!("date overflow stepping past {date}"))
            })?;
            day_index += 1;
        }

        log::info!(
            "conversion finished: {} lines, {} routes, {} departures, {} facilities",
            schedule.line_count(),
            schedule.route_count(),
            schedule.departure_count(),
            schedule.facility_count()
        );
        Ok(schedule)
    }

    /// convert one day of the window: resolve active services, filter
    /// trips, register lines of newly seen routes, fold each trip into a
    /// route pattern and emit its departures.
    fn convert_day(
        &self,
        feed: &Feed,
        date: NaiveDate,
        day_offset: u32,
        schedule: &mut TransitSchedule,
        tables: &mut ConversionTables,
    ) -> Result<(), ConvertError> {
        let active = calendar_ops::active_services(&feed.services, date);
        log::info!(
            "{} ({}): {} active services",
            date,
            date.weekday(),
            active.len()
        );

        let mut active_trips: Vec<(&Trip, &RouteDef)> = vec![];
        for trip in feed.trips.values() {
            if !active.contains(&trip.service_id) {
                continue;
            }
            if !self.config.include_trip(trip) {
                continue;
            }
            let route = feed.routes.get(&trip.route_id).ok_or_else(|| {
                ConvertError::MalformedFeed(format!(
                    "trip '{}' references unknown route '{}'",
                    trip.id, trip.route_id
                ))
            })?;
            if !self.config.include_agency(route.agency_id.as_deref()) {
                continue;
            }
            if !self.config.include_route_type(route.route_type) {
                continue;
            }
            active_trips.push((trip, route));
        }

        if active_trips.is_empty() {
            log::warn!("no active trips on {date}; another date may fit the feed better");
            return Ok(());
        }

        for (_, route) in &active_trips {
            let line_id = id_ops::line_id(&self.config.prefix, route);
            if !schedule.contains_line(&line_id) {
                let name = id_ops::line_name(route).to_string();
                let ascii = id_ops::ascii_name(&name);
                schedule.add_line(TransitLine::new(
                    line_id,
                    name,
                    ascii,
                    route.agency_id.clone(),
                    route.route_type,
                ));
            }
        }

        let mut scheduled = 0usize;
        let mut frequency = 0usize;
        for (trip, route) in &active_trips {
            let trip_stops =
                stop_time_ops::build_route_stops(trip, feed, schedule, tables, &self.config)?;
            pattern_ops::resolve_route(
                schedule,
                tables,
                trip,
                route,
                trip_stops.stops,
                &self.config,
            )?;
            let (s, f) = departure_ops::generate_departures(
                schedule,
                tables,
                trip,
                trip_stops.origin_departure,
                day_offset,
                &self.config,
            )?;
            scheduled += s;
            frequency += f;
        }
        log::info!(
            "{date}: {scheduled} scheduled and {frequency} frequency-based departures created"
        );
        Ok(())
    }

    /// carry transfers.txt minimum transfer times over to the facilities
    /// that survived merging. pairs whose endpoints were filtered away are
    /// dropped, not an error.
    fn convert_transfer_times(
        &self,
        feed: &Feed,
        tables: &ConversionTables,
        schedule: &mut TransitSchedule,
    ) {
        for transfer in &feed.transfers {
            let from = tables.facility_for_stop(&self.config, &transfer.from_stop_id);
            let to = tables.facility_for_stop(&self.config, &transfer.to_stop_id);
            match (
                schedule.facility(&from).is_some(),
                schedule.facility(&to).is_some(),
                transfer.min_transfer_time,
            ) {
                (true, true, Some(seconds)) => {
                    schedule.set_min_transfer_time(from, to, seconds);
                }
                _ => log::debug!(
                    "dropping transfer {} -> {}: endpoint filtered or no time given",
                    transfer.from_stop_id,
                    transfer.to_stop_id
                ),
            }
        }
    }

    /// log the date span the feed mentions anywhere, as an orientation aid
    /// when a chosen window yields little or no service.
    fn log_feed_span(&self, feed: &Feed) {
        let mut earliest: Option<NaiveDate> = None;
        let mut latest: Option<NaiveDate> = None;
        let mut cover = |date: NaiveDate| {
            earliest = Some(earliest.map_or(date, |e| e.min(date)));
            latest = Some(latest.map_or(date, |l| l.max(date)));
        };
        for service in feed.services.values() {
            if let Some(weekly) = &service.weekly {
                cover(weekly.start_date);
                cover(weekly.end_date);
            }
            for date in service.exceptions.keys() {
                cover(*date);
            }
        }
        match (earliest, latest) {
            (Some(e), Some(l)) => log::info!("feed mentions dates between {e} and {l}"),
            _ => log::warn!("feed mentions no dates at all"),
        }
    }
}
