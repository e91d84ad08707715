//! GTFS conversion entry points: convert archives into a transit schedule
//! and export it, or print summary statistics for a converted window.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use clap::{value_parser, Subcommand};
use kdam::{Bar, BarExt};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::{writer_ops, AppConfig, ScheduleSummary};
use crate::convert::{ConvertConfig, ConvertError, Converter, DistancePolicy, StopMergePolicy};
use crate::feed::Feed;
use crate::model::TransitSchedule;

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum SchedOperation {
    /// convert a GTFS archive, or a directory of archives, into a transit
    /// schedule and export it as csv.gz tables
    Convert {
        /// a GTFS archive (zip or extracted directory) or a directory of
        /// .zip archives to merge into one schedule
        #[arg(long)]
        input: String,

        #[arg(long)]
        output_directory: String,

        /// single day to extract
        #[arg(long, value_parser = value_parser!(NaiveDate))]
        date: Option<NaiveDate>,

        /// first day of a date range to extract
        #[arg(long, value_parser = value_parser!(NaiveDate))]
        start_date: Option<NaiveDate>,

        /// last day of a date range to extract, inclusive
        #[arg(long, value_parser = value_parser!(NaiveDate))]
        end_date: Option<NaiveDate>,

        /// configuration file with dates, policies and whitelist filters
        #[arg(long)]
        config_file: Option<String>,

        #[arg(long, value_enum)]
        merge_stops: Option<StopMergePolicy>,

        #[arg(long, value_enum)]
        distance: Option<DistancePolicy>,

        /// label routes with the extended route type taxonomy
        #[arg(long, default_value_t = false)]
        extended_route_types: bool,

        /// carry transfers.txt minimum transfer times into the schedule
        #[arg(long, default_value_t = false)]
        min_transfer_times: bool,

        /// id prefix; with several archives each gets "<prefix><index>_"
        #[arg(long, default_value_t = String::from(""))]
        prefix: String,

        /// drop facilities no route pattern visits before exporting
        #[arg(long, default_value_t = false)]
        prune_unserved: bool,

        #[arg(long, default_value_t = true)]
        overwrite: bool,

        #[arg(long, default_value_t = 1)]
        parallelism: usize,
    },
    /// convert and print schedule statistics as JSON, without exporting
    Summary {
        /// a GTFS archive (zip or extracted directory) or a directory of
        /// .zip archives
        #[arg(long)]
        input: String,

        #[arg(long, value_parser = value_parser!(NaiveDate))]
        date: Option<NaiveDate>,

        #[arg(long, value_parser = value_parser!(NaiveDate))]
        start_date: Option<NaiveDate>,

        #[arg(long, value_parser = value_parser!(NaiveDate))]
        end_date: Option<NaiveDate>,

        #[arg(long)]
        config_file: Option<String>,

        #[arg(long, default_value_t = 1)]
        parallelism: usize,
    },
}

impl SchedOperation {
    pub fn run(&self) -> Result<(), ConvertError> {
        match self {
            SchedOperation::Convert {
                input,
                output_directory,
                date,
                start_date,
                end_date,
                config_file,
                merge_stops,
                distance,
                extended_route_types,
                min_transfer_times,
                prefix,
                prune_unserved,
                overwrite,
                parallelism,
            } => {
                let app_config = read_config_file(config_file)?;
                let mut schedule = assemble(
                    input,
                    *date,
                    *start_date,
                    *end_date,
                    app_config.as_ref(),
                    *merge_stops,
                    *distance,
                    *extended_route_types,
                    *min_transfer_times,
                    prefix,
                    *parallelism,
                )?;
                if *prune_unserved {
                    schedule.retain_served_facilities();
                }
                writer_ops::write_schedule(&schedule, Path::new(output_directory), *overwrite)?;
                print_summary(&schedule)
            }
            SchedOperation::Summary {
                input,
                date,
                start_date,
                end_date,
                config_file,
                parallelism,
            } => {
                let app_config = read_config_file(config_file)?;
                let schedule = assemble(
                    input,
                    *date,
                    *start_date,
                    *end_date,
                    app_config.as_ref(),
                    None,
                    None,
                    false,
                    false,
                    "",
                    *parallelism,
                )?;
                print_summary(&schedule)
            }
        }
    }
}

fn read_config_file(config_file: &Option<String>) -> Result<Option<AppConfig>, ConvertError> {
    config_file.as_deref().map(AppConfig::from_file).transpose()
}

fn print_summary(schedule: &TransitSchedule) -> Result<(), ConvertError> {
    let summary = ScheduleSummary::of(schedule);
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| ConvertError::Other(format!("failed serializing summary: {e}")))?;
    println!("{json}");
    Ok(())
}

/// convert every bundle under `input` and merge the results into one
/// schedule. multiple bundles run in parallel and get index-derived id
/// prefixes so their id spaces cannot collide.
#[allow(clippy::too_many_arguments)]
fn assemble(
    input: &str,
    date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    app_config: Option<&AppConfig>,
    merge_stops: Option<StopMergePolicy>,
    distance: Option<DistancePolicy>,
    extended_route_types: bool,
    min_transfer_times: bool,
    prefix: &str,
    parallelism: usize,
) -> Result<TransitSchedule, ConvertError> {
    let (start, end) = resolve_window(date, start_date, end_date, app_config)?;
    let merge_policy = merge_stops
        .or_else(|| app_config.and_then(|c| c.merge_stops))
        .unwrap_or_default();
    let distance_policy = distance
        .or_else(|| app_config.and_then(|c| c.distance))
        .unwrap_or_default();
    let extended = extended_route_types
        || app_config
            .and_then(|c| c.extended_route_types)
            .unwrap_or(false);
    let transfers = min_transfer_times
        || app_config
            .and_then(|c| c.min_transfer_times)
            .unwrap_or(false);
    let base_prefix = if prefix.is_empty() {
        app_config
            .and_then(|c| c.prefix.clone())
            .unwrap_or_default()
    } else {
        prefix.to_string()
    };

    let bundles = collect_bundles(input)?;
    log::info!(
        "converting {} bundle(s) for [{start}, {end}] with {parallelism} worker(s)",
        bundles.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()
        .map_err(|e| ConvertError::Other(format!("failed building thread pool: {e}")))?;
    let bar = Mutex::new(
        Bar::builder()
            .total(bundles.len())
            .desc("bundles")
            .build()
            .map_err(ConvertError::Other)?,
    );

    let single = bundles.len() == 1;
    let results: Vec<Result<TransitSchedule, ConvertError>> = pool.install(|| {
        bundles
            .par_iter()
            .enumerate()
            .map(|(index, bundle)| {
                let bundle_prefix = if single {
                    base_prefix.clone()
                } else {
                    format!("{base_prefix}{index}_")
                };
                let mut config = ConvertConfig::for_window(start, end)
                    .with_merge_policy(merge_policy)
                    .with_distance_policy(distance_policy)
                    .with_extended_route_types(extended)
                    .with_minimal_transfer_times(transfers)
                    .with_prefix(bundle_prefix);
                if let Some(c) = app_config {
                    config = c.apply_filters(config);
                }
                let converter = Converter::new(config)?;
                let path = bundle.to_str().ok_or_else(|| {
                    ConvertError::Other(format!("bundle path {bundle:?} is not valid utf-8"))
                })?;
                let feed = Feed::open(path)?;
                let schedule = converter.convert(&feed)?;
                if let Ok(mut b) = bar.lock() {
                    let _ = b.update(1);
                }
                Ok(schedule)
            })
            .collect()
    });

    let schedules = results
        .into_iter()
        .collect::<Result<Vec<TransitSchedule>, ConvertError>>()?;
    let mut iter = schedules.into_iter();
    let mut merged = iter
        .next()
        .ok_or_else(|| ConvertError::Other(String::from("no schedules were produced")))?;
    for schedule in iter {
        merged.merge(schedule).map_err(ConvertError::Other)?;
    }
    Ok(merged)
}

/// pick the conversion window: an explicit range wins, then a single date,
/// then today.
fn resolve_window(
    date: Option<NaiveDate>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    app_config: Option<&AppConfig>,
) -> Result<(NaiveDate, NaiveDate), ConvertError> {
    let date = date.or_else(|| app_config.and_then(|c| c.date));
    let start = start_date.or_else(|| app_config.and_then(|c| c.start_date));
    let end = end_date.or_else(|| app_config.and_then(|c| c.end_date));
    match (start, end, date) {
        (Some(s), Some(e), _) => Ok((s, e)),
        (Some(_), None, _) | (None, Some(_), _) => Err(ConvertError::Other(String::from(
            "a date range needs both --start-date and --end-date",
        ))),
        (None, None, Some(d)) => Ok((d, d)),
        (None, None, None) => {
            let today = chrono::Local::now().date_naive();
            log::warn!("no date given; defaulting to today ({today})");
            Ok((today, today))
        }
    }
}

/// the GTFS bundles behind an input path: the file itself, an extracted
/// feed directory, or every .zip inside a collection directory (sorted,
/// so bundle indices are stable between runs).
fn collect_bundles(input: &str) -> Result<Vec<PathBuf>, ConvertError> {
    let path = Path::new(input);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        if path.join("stops.txt").exists() {
            return Ok(vec![path.to_path_buf()]);
        }
        let mut zips: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|e| ConvertError::Other(format!("failure reading '{input}': {e}")))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().map(|ext| ext == "zip").unwrap_or(false))
            .collect();
        zips.sort();
        if zips.is_empty() {
            return Err(ConvertError::Other(format!(
                "no GTFS archives found in '{input}'"
            )));
        }
        return Ok(zips);
    }
    Err(ConvertError::Other(format!("input '{input}' not found")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_range_wins_over_single_date() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 9).unwrap();
        let single = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let window =
            resolve_window(Some(single), Some(start), Some(end), None).expect("valid window");
        assert_eq!(window, (start, end));
    }

    #[test]
    fn test_half_open_range_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 7).unwrap();
        assert!(resolve_window(None, Some(start), None, None).is_err());
    }

    #[test]
    fn test_config_file_window_applies_when_cli_is_silent() {
        let app_config = AppConfig {
            date: Some(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()),
            ..AppConfig::default()
        };
        let window = resolve_window(None, None, None, Some(&app_config)).expect("valid window");
        assert_eq!(window.0, window.1);
        assert_eq!(window.0, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(collect_bundles("/definitely/not/here").is_err());
    }

    #[test]
    fn test_extracted_feed_directory_is_one_bundle() {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test")
            .join("fixture-feed");
        let bundles = collect_bundles(fixture.to_str().unwrap()).expect("fixture exists");
        assert_eq!(bundles.len(), 1);
    }
}
