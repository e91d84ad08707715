/// the transport mode behind a GTFS route_type code. every route in the
/// output schedule carries a mode label; a code outside this table is a
/// conversion error, because downstream simulation cannot run a vehicle of
/// unknown kind.
///
/// covers the basic route_type table plus the extended route type ranges
/// (railway 1xx, coach 2xx, urban rail 4xx, bus 7xx, trolleybus 800,
/// tram 9xx, water 10xx/12xx, aerial lift 13xx, funicular 14xx).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportMode {
    code: i32,
    simple: &'static str,
    extended: &'static str,
}

impl TransportMode {
    pub fn from_code(code: i32) -> Option<TransportMode> {
        let (simple, extended) = match code {
            0 => ("tram", "tram"),
            1 => ("subway", "subway"),
            2 => ("rail", "rail"),
            3 => ("bus", "bus"),
            4 => ("ferry", "ferry"),
            5 => ("cable_car", "cable_car"),
            6 => ("gondola", "gondola"),
            7 => ("funicular", "funicular"),
            11 => ("bus", "trolleybus"),
            12 => ("rail", "monorail"),
            100..=117 => ("rail", "railway_service"),
            200..=209 => ("bus", "coach_service"),
            400..=404 => ("subway", "urban_railway_service"),
            405 => ("rail", "monorail_service"),
            700..=716 => ("bus", "bus_service"),
            800 => ("bus", "trolleybus_service"),
            900..=906 => ("tram", "tram_service"),
            1000 => ("ferry", "water_transport_service"),
            1200 => ("ferry", "ferry_service"),
            1300..=1307 => ("gondola", "aerial_lift_service"),
            1400 => ("funicular", "funicular_service"),
            _ => return None,
        };
        Some(TransportMode {
            code,
            simple,
            extended,
        })
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    /// the coarse mode name shared by all codes of a family
    pub fn simple_name(&self) -> &'static str {
        self.simple
    }

    /// the finer extended-taxonomy name
    pub fn extended_name(&self) -> &'static str {
        self.extended
    }

    pub fn label(&self, use_extended: bool) -> &'static str {
        if use_extended {
            self.extended
        } else {
            self.simple
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_basic_codes_map_to_simple_modes() {
        assert_eq!(TransportMode::from_code(0).unwrap().simple_name(), "tram");
        assert_eq!(TransportMode::from_code(3).unwrap().simple_name(), "bus");
        assert_eq!(TransportMode::from_code(7).unwrap().simple_name(), "funicular");
    }

    #[test]
    fn test_extended_codes_collapse_to_simple_families() {
        let suburban = TransportMode::from_code(109).unwrap();
        assert_eq!(suburban.simple_name(), "rail");
        assert_eq!(suburban.extended_name(), "railway_service");

        let city_bus = TransportMode::from_code(704).unwrap();
        assert_eq!(city_bus.simple_name(), "bus");
        assert_eq!(city_bus.extended_name(), "bus_service");
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert!(TransportMode::from_code(9999).is_none());
        assert!(TransportMode::from_code(-1).is_none());
    }
}
