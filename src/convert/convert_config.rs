use chrono::NaiveDate;
use geo::Point;

use crate::convert::{DistancePolicy, StopMergePolicy};
use crate::feed::{Stop, Trip};

pub type TripPredicate = Box<dyn Fn(&Trip) -> bool>;
pub type StopPredicate = Box<dyn Fn(&Stop) -> bool>;
pub type AgencyPredicate = Box<dyn Fn(Option<&str>) -> bool>;
pub type RouteTypePredicate = Box<dyn Fn(i32) -> bool>;
pub type CoordTransform = Box<dyn Fn(Point<f64>) -> Point<f64>>;

/// everything one conversion run is parameterized by. every knob has an
/// explicit default: a one-day window is the minimal constructor argument,
/// the transform is the identity, and all inclusion predicates accept.
pub struct ConvertConfig {
    /// first day of the conversion window
    pub start_date: NaiveDate,
    /// last day of the conversion window, inclusive
    pub end_date: NaiveDate,
    pub merge_policy: StopMergePolicy,
    pub distance_policy: DistancePolicy,
    /// label routes with the extended route-type taxonomy instead of the
    /// coarse mode families
    pub use_extended_route_types: bool,
    /// convert transfers.txt minimum transfer times into the schedule
    pub include_minimal_transfer_times: bool,
    /// prepended to every generated id; lets several feeds merge into one
    /// schedule without collisions
    pub prefix: String,
    transform: Option<CoordTransform>,
    trip_filter: Option<TripPredicate>,
    stop_filter: Option<StopPredicate>,
    agency_filter: Option<AgencyPredicate>,
    route_type_filter: Option<RouteTypePredicate>,
}

impl ConvertConfig {
    /// configuration for extracting a single day.
    pub fn for_date(date: NaiveDate) -> ConvertConfig {
        ConvertConfig::for_window(date, date)
    }

    /// configuration for extracting a date range, both ends inclusive.
    pub fn for_window(start_date: NaiveDate, end_date: NaiveDate) -> ConvertConfig {
        ConvertConfig {
            start_date,
            end_date,
            merge_policy: StopMergePolicy::default(),
            distance_policy: DistancePolicy::default(),
            use_extended_route_types: false,
            include_minimal_transfer_times: false,
            prefix: String::new(),
            transform: None,
            trip_filter: None,
            stop_filter: None,
            agency_filter: None,
            route_type_filter: None,
        }
    }

    pub fn with_merge_policy(mut self, policy: StopMergePolicy) -> ConvertConfig {
        self.merge_policy = policy;
        self
    }

    pub fn with_distance_policy(mut self, policy: DistancePolicy) -> ConvertConfig {
        self.distance_policy = policy;
        self
    }

    pub fn with_extended_route_types(mut self, use_extended: bool) -> ConvertConfig {
        self.use_extended_route_types = use_extended;
        self
    }

    pub fn with_minimal_transfer_times(mut self, include: bool) -> ConvertConfig {
        self.include_minimal_transfer_times = include;
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> ConvertConfig {
        self.prefix = prefix.into();
        self
    }

    /// coordinate transform from feed lon,lat into the target system of the
    /// simulation; identity when unset.
    pub fn with_transform(mut self, transform: CoordTransform) -> ConvertConfig {
        self.transform = Some(transform);
        self
    }

    pub fn with_trip_filter(mut self, filter: TripPredicate) -> ConvertConfig {
        self.trip_filter = Some(filter);
        self
    }

    pub fn with_stop_filter(mut self, filter: StopPredicate) -> ConvertConfig {
        self.stop_filter = Some(filter);
        self
    }

    pub fn with_agency_filter(mut self, filter: AgencyPredicate) -> ConvertConfig {
        self.agency_filter = Some(filter);
        self
    }

    pub fn with_route_type_filter(mut self, filter: RouteTypePredicate) -> ConvertConfig {
        self.route_type_filter = Some(filter);
        self
    }

    pub fn transform_point(&self, point: Point<f64>) -> Point<f64> {
        match &self.transform {
            Some(t) => t(point),
            None => point,
        }
    }

    pub fn include_trip(&self, trip: &Trip) -> bool {
        self.trip_filter.as_ref().map(|f| f(trip)).unwrap_or(true)
    }

    pub fn include_stop(&self, stop: &Stop) -> bool {
        self.stop_filter.as_ref().map(|f| f(stop)).unwrap_or(true)
    }

    pub fn include_agency(&self, agency_id: Option<&str>) -> bool {
        self.agency_filter
            .as_ref()
            .map(|f| f(agency_id))
            .unwrap_or(true)
    }

    pub fn include_route_type(&self, route_type: i32) -> bool {
        self.route_type_filter
            .as_ref()
            .map(|f| f(route_type))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_accept_everything() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date);
        assert_eq!(config.start_date, config.end_date);
        assert!(config.include_agency(None));
        assert!(config.include_route_type(3));
        assert_eq!(config.merge_policy, StopMergePolicy::DoNotMerge);
        let p = config.transform_point(Point::new(-105.0, 40.0));
        assert_eq!(p, Point::new(-105.0, 40.0));
    }

    #[test]
    fn test_filters_apply() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let config = ConvertConfig::for_date(date)
            .with_route_type_filter(Box::new(|code| code == 0))
            .with_agency_filter(Box::new(|agency| agency == Some("AG1")));
        assert!(config.include_route_type(0));
        assert!(!config.include_route_type(3));
        assert!(config.include_agency(Some("AG1")));
        assert!(!config.include_agency(None));
    }
}
