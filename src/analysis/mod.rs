//! Post-hoc reduction of simulation event logs to epidemiological summary
//! tables.
//!
//! Every subdirectory of the output root is treated as one scenario holding an
//! `events` directory of gzipped event files. Each scenario gets its own
//! `<scenario>.rValues.txt` and `<scenario>.infectionsPerActivity.txt`;
//! aggregated `rValues.txt` and `infectionsPerActivity.txt` across all
//! scenarios are written to the output root.

mod handlers;

pub use handlers::{coarsen_activity, ActivityTally, ReproductionHandler, ACTIVITY_BUCKETS};

use chrono::{Days, NaiveDate};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::ContagionError;
use crate::events::read_events;

/// One analysis run over an output directory.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Directory containing one subdirectory per scenario.
    pub output: PathBuf,
    /// Calendar date of simulation day 0.
    pub start_date: NaiveDate,
    /// Explicit simulation length in days. When absent, the per-scenario
    /// event file count is used as a stand-in.
    pub days: Option<usize>,
}

impl AnalysisOptions {
    pub fn new(output: impl Into<PathBuf>, start_date: NaiveDate) -> AnalysisOptions {
        AnalysisOptions {
            output: output.into(),
            start_date,
            days: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RValueRow<'a> {
    day: usize,
    date: NaiveDate,
    r_value: f64,
    new_contagious: usize,
    scenario: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfectionRow<'a> {
    day: usize,
    date: NaiveDate,
    activity: &'a str,
    infections: u32,
    infections_share: f64,
    scenario: &'a str,
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<File>, ContagionError> {
    let file = File::create(path)?;
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_writer(file))
}

/// Calculates R values and per-activity infection attributions for all
/// scenarios below `options.output`, dated on the day of switching to
/// contagious.
///
/// Scenarios without an `events` directory and unreadable event files are
/// skipped with a warning; results are a pure function of the multiset of
/// readable events.
///
/// # Errors
///
/// Returns a `ContagionError` when the output root is missing or any output
/// table cannot be written.
pub fn calculate_r_values(options: &AnalysisOptions) -> Result<(), ContagionError> {
    if !options.output.is_dir() {
        return Err(ContagionError::ConfigError(format!(
            "output path {} does not exist",
            options.output.display()
        )));
    }

    let mut r_values = tsv_writer(&options.output.join("rValues.txt"))?;
    let mut infections = tsv_writer(&options.output.join("infectionsPerActivity.txt"))?;

    let mut scenarios = Vec::new();
    for entry in fs::read_dir(&options.output)? {
        let path = entry?.path();
        if path.is_dir() {
            scenarios.push(path);
        }
    }
    scenarios.sort();

    for scenario in &scenarios {
        process_scenario(scenario, options, &mut r_values, &mut infections)?;
    }

    r_values.flush()?;
    infections.flush()?;
    info!("done, processed {} scenarios", scenarios.len());
    Ok(())
}

fn event_files(events_dir: &Path) -> Result<Vec<PathBuf>, ContagionError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(events_dir)? {
        let path = entry?.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".json.gz"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn process_scenario(
    scenario: &Path,
    options: &AnalysisOptions,
    r_values: &mut csv::Writer<File>,
    infections: &mut csv::Writer<File>,
) -> Result<(), ContagionError> {
    let events_dir = scenario.join("events");
    if !events_dir.is_dir() {
        warn!("no events found at {}", events_dir.display());
        return Ok(());
    }

    let name = scenario
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let files = event_files(&events_dir)?;

    let mut reproduction = ReproductionHandler::default();
    let mut tally = ActivityTally::default();

    for file in &files {
        match read_events(file) {
            Ok(events) => {
                for event in &events {
                    reproduction.handle(event);
                    tally.handle(event);
                }
            }
            Err(error) => {
                warn!("could not read event file {}: {error}", file.display());
            }
        }
    }

    // one trailing day beyond the nominal length to catch boundary effects
    let last_day = options.days.unwrap_or(files.len());

    let mut scenario_r = tsv_writer(&scenario.join(format!("{name}.rValues.txt")))?;
    let mut scenario_infections =
        tsv_writer(&scenario.join(format!("{name}.infectionsPerActivity.txt")))?;

    for day in 0..=last_day {
        let date = options.start_date + Days::new(day as u64);

        for bucket in ACTIVITY_BUCKETS {
            let row = InfectionRow {
                day,
                date,
                activity: bucket,
                infections: tally.infections(bucket, day),
                infections_share: tally.share(bucket, day),
                scenario: &name,
            };
            scenario_infections.serialize(&row)?;
            infections.serialize(&row)?;
        }

        let (r_value, new_contagious) = reproduction.r_value(day);
        let row = RValueRow {
            day,
            date,
            r_value,
            new_contagious,
            scenario: &name,
        };
        scenario_r.serialize(&row)?;
        r_values.serialize(&row)?;
    }

    scenario_r.flush()?;
    scenario_infections.flush()?;
    info!("calculated results for scenario {name}");
    Ok(())
}
