use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::feed::Service;

/// the ids of all services operating on the given date. weekly patterns
/// apply within their validity range; calendar_dates exceptions override
/// the weekly answer for their specific date. a pure function of the
/// service table, so per-day resolution can run independently per date.
pub fn active_services(
    services: &BTreeMap<String, Service>,
    date: NaiveDate,
) -> BTreeSet<String> {
    services
        .values()
        .filter(|service| service.active_on(date))
        .map(|service| service.id.clone())
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feed::{ServiceException, Weekly};

    fn service_table() -> BTreeMap<String, Service> {
        let weekdays = Weekly {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        };
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        BTreeMap::from([
            (
                String::from("WK"),
                Service {
                    id: String::from("WK"),
                    weekly: Some(weekdays),
                    exceptions: BTreeMap::from([(saturday, ServiceException::Added)]),
                },
            ),
            (
                String::from("SPECIAL"),
                Service {
                    id: String::from("SPECIAL"),
                    weekly: None,
                    exceptions: BTreeMap::from([(
                        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
                        ServiceException::Added,
                    )]),
                },
            ),
        ])
    }

    #[test]
    fn test_weekday_service_active_on_monday() {
        let services = service_table();
        let monday = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let active = active_services(&services, monday);
        assert!(active.contains("WK"));
        assert!(!active.contains("SPECIAL"));
    }

    #[test]
    fn test_added_saturday_included_ordinary_sunday_excluded() {
        let services = service_table();
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        assert!(active_services(&services, saturday).contains("WK"));
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 13).unwrap();
        assert!(!active_services(&services, sunday).contains("WK"));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let services = service_table();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(
            active_services(&services, date),
            active_services(&services, date)
        );
    }

    #[test]
    fn test_no_service_day_yields_empty_set() {
        let services = service_table();
        // a sunday outside any added exception
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        assert!(active_services(&services, sunday).is_empty());
    }
}
