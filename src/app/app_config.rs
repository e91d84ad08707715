use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::convert::{ConvertConfig, ConvertError, DistancePolicy, StopMergePolicy};

/// file-based run configuration, layered under the CLI flags: a flag given
/// on the command line wins over the file, the file wins over defaults.
/// filters that cannot be expressed as flags (route type and agency
/// whitelists) live here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub merge_stops: Option<StopMergePolicy>,
    pub distance: Option<DistancePolicy>,
    pub extended_route_types: Option<bool>,
    pub min_transfer_times: Option<bool>,
    pub prefix: Option<String>,
    /// restrict conversion to these GTFS route type codes
    pub route_types: Option<Vec<i32>>,
    /// restrict conversion to these agency ids
    pub agencies: Option<Vec<String>>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<AppConfig, ConvertError> {
        config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                ConvertError::Other(format!("failure reading config file '{path}': {e}"))
            })
    }

    /// apply the whitelist filters to a runtime configuration.
    pub fn apply_filters(&self, mut config: ConvertConfig) -> ConvertConfig {
        if let Some(route_types) = self.route_types.clone() {
            config = config.with_route_type_filter(Box::new(move |code| {
                route_types.contains(&code)
            }));
        }
        if let Some(agencies) = self.agencies.clone() {
            config = config.with_agency_filter(Box::new(move |agency| {
                agency.map(|a| agencies.iter().any(|x| x == a)).unwrap_or(false)
            }));
        }
        config
    }
}
