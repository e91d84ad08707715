use super::SchedOperation;
use clap::Parser;

/// command line tool for converting GTFS archives into simulation-ready
/// transit schedules
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct SchedApp {
    #[command(subcommand)]
    pub op: SchedOperation,
}
