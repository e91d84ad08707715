//! converts one or more GTFS archives into a normalized transit schedule
//! ready for mobility simulation, exported as compressed tabular files.
use clap::Parser;
use gtfs2sched::app::SchedApp;

fn main() {
    env_logger::init();
    let args = SchedApp::parse();
    match args.op.run() {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
