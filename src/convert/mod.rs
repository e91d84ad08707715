mod calendar_ops;
mod convert_config;
mod convert_error;
mod converter;
mod departure_ops;
mod distance_policy;
mod id_ops;
mod pattern_ops;
mod stop_merge_policy;
mod stop_ops;
mod stop_time_ops;

pub use calendar_ops::active_services;
pub use convert_config::ConvertConfig;
pub use convert_error::ConvertError;
pub use converter::{ConversionTables, Converter};
pub use distance_policy::DistancePolicy;
pub use stop_merge_policy::StopMergePolicy;
