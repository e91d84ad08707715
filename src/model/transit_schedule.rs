use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::model::{FacilityId, LineId, StopFacility, TransitLine};

/// the assembled output: stop facilities, transit lines with their route
/// patterns and departures, and (optionally) a sparse minimum-transfer-time
/// table between facilities. valid for the date window it was built for.
#[derive(Debug, Clone)]
pub struct TransitSchedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    facilities: BTreeMap<FacilityId, StopFacility>,
    lines: BTreeMap<LineId, TransitLine>,
    min_transfer_times: BTreeMap<(FacilityId, FacilityId), u32>,
}

impl TransitSchedule {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> TransitSchedule {
        TransitSchedule {
            start_date,
            end_date,
            facilities: BTreeMap::new(),
            lines: BTreeMap::new(),
            min_transfer_times: BTreeMap::new(),
        }
    }

    /// register a facility unless its id is already taken; the first
    /// facility created for an id survives for the whole run.
    pub fn add_facility(&mut self, facility: StopFacility) {
        self.facilities.entry(facility.id.clone()).or_insert(facility);
    }

    pub fn facility(&self, id: &FacilityId) -> Option<&StopFacility> {
        self.facilities.get(id)
    }

    pub fn facilities(&self) -> impl Iterator<Item = &StopFacility> {
        self.facilities.values()
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    pub fn contains_line(&self, id: &LineId) -> bool {
        self.lines.contains_key(id)
    }

    pub fn add_line(&mut self, line: TransitLine) {
        self.lines.entry(line.id.clone()).or_insert(line);
    }

    pub fn line(&self, id: &LineId) -> Option<&TransitLine> {
        self.lines.get(id)
    }

    pub fn line_mut(&mut self, id: &LineId) -> Option<&mut TransitLine> {
        self.lines.get_mut(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &TransitLine> {
        self.lines.values()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn route_count(&self) -> usize {
        self.lines.values().map(|l| l.route_count()).sum()
    }

    pub fn departure_count(&self) -> usize {
        self.lines
            .values()
            .flat_map(|l| l.routes())
            .map(|r| r.departures().len())
            .sum()
    }

    pub fn set_min_transfer_time(&mut self, from: FacilityId, to: FacilityId, seconds: u32) {
        self.min_transfer_times.insert((from, to), seconds);
    }

    pub fn min_transfer_times(
        &self,
    ) -> impl Iterator<Item = (&(FacilityId, FacilityId), &u32)> {
        self.min_transfer_times.iter()
    }

    pub fn min_transfer_time(&self, from: &FacilityId, to: &FacilityId) -> Option<u32> {
        self.min_transfer_times
            .get(&(from.clone(), to.clone()))
            .copied()
    }

    /// optional post-pass: drop facilities no route pattern visits. merge
    /// policies and stop filters can leave facilities behind that serve no
    /// trips; pruning is kept out of id derivation so that facility ids
    /// stay stable whether or not this runs.
    pub fn retain_served_facilities(&mut self) {
        let served: BTreeSet<FacilityId> = self
            .lines
            .values()
            .flat_map(|l| l.routes())
            .flat_map(|r| r.stops())
            .map(|s| s.facility.clone())
            .collect();
        self.facilities.retain(|id, _| served.contains(id));
        self.min_transfer_times
            .retain(|(from, to), _| served.contains(from) && served.contains(to));
    }

    /// fold another schedule (from a second feed, converted with a distinct
    /// id prefix) into this one. both schedules must cover the same date
    /// window; id spaces must be disjoint.
    pub fn merge(&mut self, other: TransitSchedule) -> Result<(), String> {
        if self.start_date != other.start_date || self.end_date != other.end_date {
            return Err(format!(
                "cannot merge schedules with different windows: [{}, {}] vs [{}, {}]",
                self.start_date, self.end_date, other.start_date, other.end_date
            ));
        }
        for (id, facility) in other.facilities {
            if self.facilities.contains_key(&id) {
                return Err(format!("facility id collision on merge: '{id}'"));
            }
            self.facilities.insert(id, facility);
        }
        for (id, line) in other.lines {
            if self.lines.contains_key(&id) {
                return Err(format!("line id collision on merge: '{id}'"));
            }
            self.lines.insert(id, line);
        }
        self.min_transfer_times.extend(other.min_transfer_times);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{RouteId, RouteStop, TransitRoute};
    use geo::Point;

    fn facility(id: &str) -> StopFacility {
        StopFacility::new(
            FacilityId::new(id),
            String::from(id),
            Point::new(0.0, 0.0),
        )
    }

    fn window() -> (NaiveDate, NaiveDate) {
        let d = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        (d, d)
    }

    #[test]
    fn test_first_facility_for_an_id_survives() {
        let (start, end) = window();
        let mut schedule = TransitSchedule::new(start, end);
        let mut renamed = facility("F1");
        renamed.name = String::from("first");
        schedule.add_facility(renamed);
        let mut second = facility("F1");
        second.name = String::from("second");
        schedule.add_facility(second);

        assert_eq!(schedule.facility_count(), 1);
        assert_eq!(
            schedule.facility(&FacilityId::new("F1")).unwrap().name,
            "first"
        );
    }

    #[test]
    fn test_retain_served_facilities_prunes_unvisited() {
        let (start, end) = window();
        let mut schedule = TransitSchedule::new(start, end);
        schedule.add_facility(facility("F1"));
        schedule.add_facility(facility("F2"));

        let mut line = TransitLine::new(
            LineId::new("L1"),
            String::from("1"),
            String::from("1"),
            None,
            3,
        );
        line.add_route(TransitRoute::new(
            RouteId::new("L1_0"),
            String::from("bus"),
            vec![RouteStop {
                facility: FacilityId::new("F1"),
                arrival_offset: 0,
                departure_offset: 0,
                await_departure: true,
            }],
        ));
        schedule.add_line(line);
        schedule.set_min_transfer_time(FacilityId::new("F1"), FacilityId::new("F2"), 60);

        schedule.retain_served_facilities();

        assert_eq!(schedule.facility_count(), 1);
        assert!(schedule.facility(&FacilityId::new("F2")).is_none());
        assert_eq!(schedule.min_transfer_times().count(), 0);
    }

    #[test]
    fn test_merge_rejects_colliding_ids() {
        let (start, end) = window();
        let mut a = TransitSchedule::new(start, end);
        a.add_facility(facility("F1"));
        let mut b = TransitSchedule::new(start, end);
        b.add_facility(facility("F1"));

        assert!(a.merge(b).is_err());
    }

    #[test]
    fn test_merge_combines_disjoint_schedules() {
        let (start, end) = window();
        let mut a = TransitSchedule::new(start, end);
        a.add_facility(facility("a_F1"));
        let mut b = TransitSchedule::new(start, end);
        b.add_facility(facility("b_F1"));

        a.merge(b).expect("disjoint merge should succeed");
        assert_eq!(a.facility_count(), 2);
    }
}
