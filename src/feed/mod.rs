mod bundle;
mod route_def;
mod service;
mod stop;
mod transfer;
mod trip;

pub use bundle::Feed;
pub use route_def::RouteDef;
pub use service::{Service, ServiceException, Weekly};
pub use stop::Stop;
pub use transfer::Transfer;
pub use trip::{Frequency, StopTime, Trip};
