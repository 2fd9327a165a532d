use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Local;
use csv::{ReaderBuilder, StringRecord};

use crate::aggregate::Aggregator;
use crate::record::{parse_row, ParseOptions, ParseOutcome, RawRow, RejectReason, Rejection, SalesRecord, COLUMNS};
use crate::report::{render, Clock};
use crate::{info_time, warn_time, Error, Result, DEFAULT_INPUT_PATH, DEFAULT_REPORT_PATH};

/// Rows written by [`generate_sample`], header first.
pub const SAMPLE_ROWS: [[&str; 5]; 5] = [
    ["2025-07-15", "Laptop", "Electronics", "3", "45000"],
    ["2025-07-15", "Pen", "Stationery", "50", "10"],
    ["2025-07-16", "Chair", "Furniture", "5", "1500"],
    ["2025-07-17", "Notebook", "Stationery", "30", "25"],
    ["2025-07-17", "Smartphone", "Electronics", "2", "20000"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Initializing,
    Processing,
    Reporting,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Write the sample dataset to `input` when it doesn't exist, instead of failing.
    pub sample_fallback: bool,
    pub parse: ParseOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_REPORT_PATH),
            sample_fallback: false,
            parse: ParseOptions::default(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejections: Vec<Rejection>,
    pub total_sales: f64,
    /// `(category, subtotal)` in first-seen order.
    pub categories: Vec<(String, f64)>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Created,
    AlreadyExists,
}

/// One read → aggregate → report run. Build a new one for every input file.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Initializing,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs to completion. On error the pipeline ends up [`PipelineState::Failed`] and no
    /// report is written unless the failure happened while writing it.
    pub fn run(&mut self, clock: &impl Clock) -> Result<RunSummary> {
        match self.run_inner(clock) {
            Ok(summary) => {
                self.state = PipelineState::Done;
                Ok(summary)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                Err(e)
            }
        }
    }

    fn run_inner(&mut self, clock: &impl Clock) -> Result<RunSummary> {
        let start_time = Local::now();

        self.state = PipelineState::Initializing;
        self.locate_input()?;

        self.state = PipelineState::Processing;
        let (records, totals, rejections) = self.process()?;
        info_time!(
            "Accepted {} rows, skipped {} from {}",
            records.len(),
            rejections.len(),
            self.config.input.display()
        );

        self.state = PipelineState::Reporting;
        let text = render(&records, &totals, clock.now());
        fs::write(&self.config.output, text)?;
        info_time!(start_time, "Report created: {}", self.config.output.display());

        Ok(RunSummary {
            accepted: records.len(),
            rejections,
            total_sales: totals.total_sales(),
            categories: totals.into_categories(),
            output: self.config.output.clone(),
        })
    }

    fn locate_input(&self) -> Result<()> {
        let input = &self.config.input;
        if input.exists() {
            return Ok(());
        }
        if !self.config.sample_fallback {
            return Err(Error::InputNotFound(input.clone()));
        }
        warn_time!("{} not found, falling back to sample data", input.display());
        generate_sample(input, false)?;
        Ok(())
    }

    fn process(&self) -> Result<(Vec<SalesRecord>, Aggregator, Vec<Rejection>)> {
        let file = File::open(&self.config.input)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        let mut totals = Aggregator::new();
        let mut rejections = Vec::new();

        let mut record = StringRecord::new();
        loop {
            let outcome = match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => parse_row(&RawRow::from_record(&headers, &record), &self.config.parse),
                Err(e) => ParseOutcome::Rejected(undecodable_row(e)?),
            };

            match outcome {
                ParseOutcome::Accepted(rec) => {
                    totals.accumulate(&rec);
                    records.push(rec);
                }
                ParseOutcome::Rejected(rejection) => {
                    warn_time!("Skipping row, {}", rejection);
                    rejections.push(rejection);
                }
            }
        }

        Ok((records, totals, rejections))
    }
}

/// A record the reader couldn't decode is a bad row, an I/O failure ends the run.
fn undecodable_row(e: csv::Error) -> Result<Rejection> {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    match e.kind() {
        csv::ErrorKind::Io(_) => Err(Error::Csv(e)),
        _ => Ok(Rejection {
            line,
            reason: RejectReason::Malformed(e.to_string()),
        }),
    }
}

/// Writes the fixed sample dataset to `path`. An existing file is kept unless `overwrite`.
pub fn generate_sample(path: &Path, overwrite: bool) -> Result<SampleOutcome> {
    if path.exists() && !overwrite {
        info_time!("File '{}' already exists.", path.display());
        return Ok(SampleOutcome::AlreadyExists);
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info_time!("Created sample CSV: {}", path.display());
    Ok(SampleOutcome::Created)
}
