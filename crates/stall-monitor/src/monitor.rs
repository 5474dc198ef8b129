//! Row-by-row stall classification.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Configuration for the stall monitor.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// CSV file with `time` and `temperature` columns
    #[clap(long, env = "STALL_CSV_FILE")]
    pub file: PathBuf,

    /// Lowest temperature (inclusive) considered a stall
    #[clap(long, default_value_t = 150.0, allow_negative_numbers = true)]
    pub stall_min: f64,

    /// Highest temperature (inclusive) considered a stall
    #[clap(long, default_value_t = 190.0, allow_negative_numbers = true)]
    pub stall_max: f64,
}

impl Config {
    pub fn range(&self) -> Result<StallRange> {
        StallRange::new(self.stall_min, self.stall_max)
    }
}

/// Inclusive temperature range in which cooking has stalled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallRange {
    min: f64,
    max: f64,
}

impl StallRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            anyhow::bail!("Invalid stall range: min {min} must not exceed max {max}");
        }
        Ok(Self { min, max })
    }

    pub fn classify(&self, temperature: f64) -> Classification {
        if self.min <= temperature && temperature <= self.max {
            Classification::Stall
        } else {
            Classification::Normal
        }
    }
}

impl Default for StallRange {
    fn default() -> Self {
        Self {
            min: 150.0,
            max: 190.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Stall,
    Normal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub rows: u64,
    pub stalled: u64,
}

#[derive(Debug, Deserialize)]
struct Reading {
    time: String,
    temperature: f64,
}

/// Classify every row of the configured CSV file.
pub fn monitor(config: &Config) -> Result<Summary> {
    let range = config.range()?;
    info!("Starting CSV consumer...");

    let file = std::fs::File::open(&config.file)
        .with_context(|| format!("Failed to open CSV file {}", config.file.display()))?;
    let summary = classify_reader(file, range)
        .with_context(|| format!("Failed to process CSV file {}", config.file.display()))?;

    info!(
        "CSV consumer finished processing: {} rows, {} in stall range.",
        summary.rows, summary.stalled
    );
    Ok(summary)
}

/// Classify `time,temperature` rows from any reader. Headers are required.
pub fn classify_reader<R: std::io::Read>(reader: R, range: StallRange) -> Result<Summary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut summary = Summary::default();
    for (index, row) in csv_reader.deserialize::<Reading>().enumerate() {
        let reading = row.with_context(|| format!("Invalid CSV row {}", index + 1))?;
        let temperature = reading.temperature;

        match range.classify(temperature) {
            Classification::Stall => {
                summary.stalled += 1;
                info!(
                    "Time {}: Food temperature is in stall range ({temperature}°F). Adjusting cooking settings.",
                    reading.time
                );
            }
            Classification::Normal => info!(
                "Time {}: Food temperature is {temperature}°F, no stall detected.",
                reading.time
            ),
        }
        summary.rows += 1;
    }

    Ok(summary)
}
