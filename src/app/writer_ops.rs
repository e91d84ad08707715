use std::fs::File;
use std::path::Path;

use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};
use serde::Serialize;

use crate::convert::ConvertError;
use crate::model::TransitSchedule;

#[derive(Serialize)]
struct FacilityRow {
    facility_id: String,
    name: String,
    x: f64,
    y: f64,
    stop_area_id: Option<String>,
}

#[derive(Serialize)]
struct RouteStopRow {
    line_id: String,
    route_id: String,
    stop_index: usize,
    facility_id: String,
    arrival_offset: i32,
    departure_offset: i32,
    await_departure: bool,
}

#[derive(Serialize)]
struct DepartureRow {
    line_id: String,
    route_id: String,
    mode: String,
    departure_id: String,
    time: u32,
    vehicle_id: Option<String>,
}

#[derive(Serialize)]
struct TransferRow {
    from_facility_id: String,
    to_facility_id: String,
    seconds: u32,
}

/// export the assembled schedule as gzip-compressed CSV tables into the
/// output directory: stop facilities, route stop sequences, departures,
/// and (when present) minimum transfer times.
pub fn write_schedule(
    schedule: &TransitSchedule,
    output_directory: &Path,
    overwrite: bool,
) -> Result<(), ConvertError> {
    std::fs::create_dir_all(output_directory).map_err(|e| {
        ConvertError::Other(format!(
            "failed creating output directory {output_directory:?}: {e}"
        ))
    })?;

    if let Some(mut writer) = create_writer(output_directory, "stop_facilities.csv.gz", overwrite)?
    {
        for facility in schedule.facilities() {
            let row = FacilityRow {
                facility_id: facility.id.to_string(),
                name: facility.name.clone(),
                x: facility.coord.x(),
                y: facility.coord.y(),
                stop_area_id: facility.stop_area.as_ref().map(|a| a.to_string()),
            };
            serialize_row(&mut writer, &row, "stop_facilities.csv.gz")?;
        }
    }

    if let Some(mut writer) = create_writer(output_directory, "route_stops.csv.gz", overwrite)? {
        for line in schedule.lines() {
            for route in line.routes() {
                for (stop_index, stop) in route.stops().iter().enumerate() {
                    let row = RouteStopRow {
                        line_id: line.id.to_string(),
                        route_id: route.id.to_string(),
                        stop_index,
                        facility_id: stop.facility.to_string(),
                        arrival_offset: stop.arrival_offset,
                        departure_offset: stop.departure_offset,
                        await_departure: stop.await_departure,
                    };
                    serialize_row(&mut writer, &row, "route_stops.csv.gz")?;
                }
            }
        }
    }

    if let Some(mut writer) = create_writer(output_directory, "departures.csv.gz", overwrite)? {
        for line in schedule.lines() {
            for route in line.routes() {
                for departure in route.departures() {
                    let row = DepartureRow {
                        line_id: line.id.to_string(),
                        route_id: route.id.to_string(),
                        mode: route.mode.clone(),
                        departure_id: departure.id.to_string(),
                        time: departure.time,
                        vehicle_id: departure.vehicle_id.clone(),
                    };
                    serialize_row(&mut writer, &row, "departures.csv.gz")?;
                }
            }
        }
    }

    if schedule.min_transfer_times().count() > 0 {
        if let Some(mut writer) =
            create_writer(output_directory, "min_transfer_times.csv.gz", overwrite)?
        {
            for ((from, to), seconds) in schedule.min_transfer_times() {
                let row = TransferRow {
                    from_facility_id: from.to_string(),
                    to_facility_id: to.to_string(),
                    seconds: *seconds,
                };
                serialize_row(&mut writer, &row, "min_transfer_times.csv.gz")?;
            }
        }
    }

    Ok(())
}

fn serialize_row<S: Serialize>(
    writer: &mut csv::Writer<GzEncoder<File>>,
    row: &S,
    filename: &str,
) -> Result<(), ConvertError> {
    writer
        .serialize(row)
        .map_err(|e| ConvertError::Other(format!("failed writing to {filename}: {e}")))
}

/// helper function to build a filewriter for .csv.gz outputs while
/// respecting the user's overwrite preference. returns None when the file
/// exists and overwriting is disabled.
fn create_writer(
    directory: &Path,
    filename: &str,
    overwrite: bool,
) -> Result<Option<csv::Writer<GzEncoder<File>>>, ConvertError> {
    let filepath = directory.join(filename);
    if filepath.exists() && !overwrite {
        log::warn!("{filepath:?} exists and overwrite is disabled, skipping");
        return Ok(None);
    }
    let file = File::create(&filepath)
        .map_err(|e| ConvertError::Other(format!("failed creating {filepath:?}: {e}")))?;
    let buffer = GzEncoder::new(file, Compression::default());
    let writer = csv::WriterBuilder::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(buffer);
    Ok(Some(writer))
}
