use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// declares a newtype identifier over String. the wrappers keep facility,
/// line, route and departure identifiers from being used interchangeably
/// while staying plain strings on the wire.
macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> $name {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type! {
    /// identifier of a transit line, derived from the GTFS route's short
    /// name and raw id
    LineId
}

id_type! {
    /// identifier of a transit route (one concrete stop pattern of a line)
    RouteId
}

id_type! {
    /// identifier of a stop facility; several GTFS stops may share one
    /// facility under a merge policy
    FacilityId
}

id_type! {
    /// identifier of a single departure event, unique schedule-wide
    DepartureId
}

id_type! {
    /// identifier of the stop area (station) a facility belongs to
    StopAreaId
}
