use crate::prelude::{println, *};
use colored::Colorize;
use sitedrift_core::histogram::{build_histogram, Histogram, HistogramBin};
use std::path::{Path, PathBuf};

use crate::store::read_percentages;

/// Default location of the output store
pub const DEFAULT_OUTPUT: &str = "site_diff_summary.csv";

#[derive(Debug, clap::Args, Clone)]
pub struct SummaryOptions {
    /// CSV file holding the accumulated comparison results
    #[arg(short, long, env = "SITEDRIFT_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, serde::Serialize)]
struct SummaryOutput {
    store: String,
    total: usize,
    bins: Vec<HistogramBin>,
}

pub async fn run(options: SummaryOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Reading results from {}", options.output.display());
    }

    let histogram = summary_data(&options.output)?;

    if options.json {
        let output = SummaryOutput {
            store: options.output.display().to_string(),
            total: histogram.total(),
            bins: histogram.labelled(),
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json);
    } else {
        print_summary(&histogram);
    }

    Ok(())
}

/// Build the histogram by re-reading the whole output store
pub fn summary_data(path: &Path) -> Result<Histogram> {
    let values = read_percentages(path)?;
    let histogram = build_histogram(&values);
    let skipped = values.len() - histogram.total();
    if skipped > 0 {
        log::debug!("{skipped} malformed percentage(s) left out of the summary");
    }
    Ok(histogram)
}

pub fn print_summary(histogram: &Histogram) {
    println!("{}", "📊 Change Summary:".bold());
    for line in histogram.lines() {
        println!("{}", line);
    }
}
