use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// a per-date override of a service's weekly pattern, from calendar_dates.txt.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceException {
    Added,
    Removed,
}

/// the weekly part of a service definition, from calendar.txt: one flag per
/// day of the week plus the date range the pattern is valid for.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Weekly {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Weekly {
    pub fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// an operating-day pattern referenced by trips: the weekly pattern from
/// calendar.txt (absent when the service is defined by exceptions alone)
/// merged with the per-date exceptions from calendar_dates.txt.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Service {
    pub id: String,
    pub weekly: Option<Weekly>,
    pub exceptions: BTreeMap<NaiveDate, ServiceException>,
}

impl Service {
    /// whether this service operates on the given date. an exception for the
    /// date always wins over the weekly pattern; without one, the weekly
    /// pattern decides, and a service with no weekly part is inactive.
    ///
    /// this is a pure function of the service definition: querying the same
    /// date twice always yields the same answer.
    pub fn active_on(&self, date: NaiveDate) -> bool {
        match self.exceptions.get(&date) {
            Some(ServiceException::Added) => true,
            Some(ServiceException::Removed) => false,
            None => match &self.weekly {
                Some(weekly) => {
                    weekly.start_date <= date
                        && date <= weekly.end_date
                        && weekly.runs_on_weekday(date.weekday())
                }
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn weekdays_only() -> Weekly {
        Weekly {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        }
    }

    #[test]
    fn test_weekly_pattern_matches_weekday() {
        let service = Service {
            id: String::from("WK"),
            weekly: Some(weekdays_only()),
            exceptions: BTreeMap::new(),
        };
        // monday
        assert!(service.active_on(NaiveDate::from_ymd_opt(2025, 7, 7).unwrap()));
        // sunday
        assert!(!service.active_on(NaiveDate::from_ymd_opt(2025, 7, 6).unwrap()));
    }

    #[test]
    fn test_outside_validity_range_is_inactive() {
        let service = Service {
            id: String::from("WK"),
            weekly: Some(weekdays_only()),
            exceptions: BTreeMap::new(),
        };
        // a monday, but before start_date
        assert!(!service.active_on(NaiveDate::from_ymd_opt(2025, 5, 26).unwrap()));
    }

    #[test]
    fn test_added_exception_overrides_weekly_pattern() {
        let saturday = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        let service = Service {
            id: String::from("WK"),
            weekly: Some(weekdays_only()),
            exceptions: BTreeMap::from([(saturday, ServiceException::Added)]),
        };
        assert!(service.active_on(saturday));
        // an ordinary sunday stays inactive
        assert!(!service.active_on(NaiveDate::from_ymd_opt(2025, 7, 13).unwrap()));
    }

    #[test]
    fn test_removed_exception_overrides_weekly_pattern() {
        let friday = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let service = Service {
            id: String::from("WK"),
            weekly: Some(weekdays_only()),
            exceptions: BTreeMap::from([(friday, ServiceException::Removed)]),
        };
        assert!(!service.active_on(friday));
        assert!(service.active_on(NaiveDate::from_ymd_opt(2025, 7, 11).unwrap()));
    }

    #[test]
    fn test_exception_only_service_active_on_added_dates_exactly() {
        let added = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let service = Service {
            id: String::from("SPECIAL"),
            weekly: None,
            exceptions: BTreeMap::from([(added, ServiceException::Added)]),
        };
        assert!(service.active_on(added));
        assert!(!service.active_on(NaiveDate::from_ymd_opt(2025, 7, 5).unwrap()));
    }
}
