use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Failed to parse GTFS bundle file: {0}")]
    BundleRead(#[from] gtfs_structures::Error),
    #[error("Conversion window start {0} is after end {1}")]
    InvalidWindow(NaiveDate, NaiveDate),
    #[error("Trip '{0}' has neither stop times nor frequencies")]
    IncompleteTrip(String),
    #[error("First and last stop times of trip '{0}' must carry times")]
    UnboundedInterpolation(String),
    #[error("Missing lon,lat data and parent location for stop: {0}")]
    MissingStopLocation(String),
    #[error("Unknown GTFS route type code {code} on route '{route_id}'")]
    UnknownRouteType { route_id: String, code: i32 },
    #[error("Departure cannot be attached to its route: {0}")]
    ConsolidationInvariant(String),
    #[error("Duplicate departure id: {0}")]
    DuplicateDeparture(String),
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),
    #[error("{0}")]
    Other(String),
}
