//! Calculates R values for all scenario runs in a given output directory,
//! dated on the day of switching to contagious.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use contagion::analysis::{calculate_r_values, AnalysisOptions};
use contagion::log::{error, set_log_level, LevelFilter};

#[derive(Parser, Debug)]
#[command(
    name = "calculate-rvalues",
    version,
    about = "Calculate R value summaries from simulation event logs"
)]
struct Args {
    /// Directory containing one subdirectory per scenario
    #[arg(long, default_value = "./output/")]
    output: PathBuf,

    /// Calendar date of simulation day 0
    #[arg(long, default_value = "2020-02-17")]
    start_date: NaiveDate,

    /// Simulation length in days; defaults to the number of event files per
    /// scenario
    #[arg(long)]
    days: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let args = Args::parse();
    set_log_level(args.log_level);

    if !args.output.is_dir() {
        error!("output path {} does not exist", args.output.display());
        return ExitCode::from(2);
    }

    let options = AnalysisOptions {
        output: args.output,
        start_date: args.start_date,
        days: args.days,
    };

    match calculate_r_values(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("analysis failed: {err}");
            ExitCode::FAILURE
        }
    }
}
