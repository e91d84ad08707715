use unicode_normalization::UnicodeNormalization;

use crate::feed::{RouteDef, Stop};
use crate::model::{FacilityId, LineId};

/// reduce a name to pure ASCII: canonical decomposition first, so accented
/// letters split into a base letter plus combining marks, then drop every
/// non-ASCII code point.
pub fn ascii_name(name: &str) -> String {
    name.nfd().filter(char::is_ascii).collect()
}

/// the rider-facing line name: the route's short name, or the raw route id
/// when the feed provides none.
pub fn line_name(route: &RouteDef) -> &str {
    match route.short_name.as_deref() {
        Some(short_name) if !short_name.is_empty() => short_name,
        _ => &route.id,
    }
}

/// derive a stable, human-readable line id. the ASCII short name alone is
/// not unique (two routes may share one), so the raw route id is appended.
pub fn line_id(prefix: &str, route: &RouteDef) -> LineId {
    LineId::new(format!(
        "{}{}---{}",
        prefix,
        ascii_name(line_name(route)),
        route.id
    ))
}

pub fn facility_id(prefix: &str, stop_id: &str) -> FacilityId {
    FacilityId::new(format!("{prefix}{stop_id}"))
}

/// display name for a stop facility: the stop name with control characters
/// removed, falling back to the stop id for unnamed stops.
pub fn display_name(stop: &Stop) -> String {
    match stop.name.as_deref() {
        Some(name) => name.chars().filter(|c| !c.is_control()).collect(),
        None => stop.id.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn route(id: &str, short_name: Option<&str>) -> RouteDef {
        RouteDef {
            id: String::from(id),
            short_name: short_name.map(String::from),
            agency_id: None,
            route_type: 3,
        }
    }

    #[test]
    fn test_ascii_name_strips_diacritics() {
        assert_eq!(ascii_name("Blå"), "Bla");
        assert_eq!(ascii_name("Škoda tramvaj"), "Skoda tramvaj");
        assert_eq!(ascii_name("32"), "32");
    }

    #[test]
    fn test_ascii_name_drops_undecomposable_symbols() {
        // no ASCII base letter to keep
        assert_eq!(ascii_name("環状線"), "");
    }

    #[test]
    fn test_line_id_concatenates_name_and_raw_id() {
        assert_eq!(
            line_id("", &route("R1", Some("Blå"))).as_str(),
            "Bla---R1"
        );
        assert_eq!(
            line_id("f1_", &route("R1", Some("10"))).as_str(),
            "f1_10---R1"
        );
    }

    #[test]
    fn test_line_id_falls_back_to_raw_route_id() {
        assert_eq!(line_id("", &route("R7", None)).as_str(), "R7---R7");
        assert_eq!(line_id("", &route("R7", Some(""))).as_str(), "R7---R7");
    }

    #[test]
    fn test_lines_sharing_a_short_name_stay_distinct() {
        let a = line_id("", &route("R1", Some("10")));
        let b = line_id("", &route("R2", Some("10")));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_name_removes_control_characters() {
        let stop = Stop {
            id: String::from("S1"),
            name: Some(String::from("Main\u{0001} St\u{000B}")),
            longitude: None,
            latitude: None,
            parent_station: None,
        };
        assert_eq!(display_name(&stop), "Main St");
    }

    #[test]
    fn test_display_name_falls_back_to_stop_id() {
        let stop = Stop {
            id: String::from("S1"),
            name: None,
            longitude: None,
            latitude: None,
            parent_station: None,
        };
        assert_eq!(display_name(&stop), "S1");
    }
}
