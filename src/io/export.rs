//! CSV export for simulation step results and tracker samples.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::tracker::SampleTracker;
use crate::sim::types::StepResult;

/// Column header for step result export.
const HEADER: &str = "step,time_s,command,outside_c,previous_c,building_c,\
                      avg_watts,heating_on,cooling_on,electric_cost,gas_cost,\
                      action_cost,reward";

/// Column header for per-second sample export.
const SAMPLE_HEADER: &str = "second,outside_c,building_c,avg_watts";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per decision step.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation results as CSV to any writer.
///
/// # Arguments
///
/// * `results` - Complete simulation step results
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.step.to_string(),
            r.time_s.to_string(),
            r.command.to_string(),
            format!("{:.4}", r.outside_temperature),
            format!("{:.6}", r.previous_temperature),
            format!("{:.6}", r.building_temperature),
            format!("{:.3}", r.avg_watts_per_second),
            r.heating_on.to_string(),
            r.cooling_on.to_string(),
            format!("{:.8}", r.electric_cost),
            format!("{:.8}", r.gas_cost),
            format!("{:.8}", r.action_cost),
            format!("{:.6}", r.reward),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports tracker samples to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_samples_csv(tracker: &SampleTracker, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_samples_csv(tracker, io::BufWriter::new(file))
}

/// Writes one row per tracked second. The `second` column counts from 1,
/// matching the building's time after each step.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_samples_csv(tracker: &SampleTracker, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SAMPLE_HEADER.split(','))?;

    for (i, s) in tracker.samples().iter().enumerate() {
        wtr.write_record(&[
            (i + 1).to_string(),
            format!("{:.4}", s.outside_temperature),
            format!("{:.6}", s.building_temperature),
            format!("{:.3}", s.avg_watts_per_second),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
