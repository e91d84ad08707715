mod app_config;
mod operation;
mod sched_app;
mod summary;
mod writer_ops;

pub use app_config::AppConfig;
pub use operation::SchedOperation;
pub use sched_app::SchedApp;
pub use summary::ScheduleSummary;
pub use writer_ops::write_schedule;
