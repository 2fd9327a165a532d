use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use sales_report::pipeline::{generate_sample, Pipeline, PipelineConfig};
use sales_report::process::{display_quotes, scrape_quotes};
use sales_report::record::ParseOptions;
use sales_report::report::SystemClock;
use sales_report::{
    error_time, info_time, Result, DEFAULT_INPUT_PATH, DEFAULT_QUOTES_URL, DEFAULT_QUOTE_PAGES,
    DEFAULT_REPORT_PATH,
};

/// Sales CSV → text report, plus a small quote scraper.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate a sales CSV into a text report.
    Report {
        #[arg(short, long, env = "SALES_REPORT_INPUT", default_value = DEFAULT_INPUT_PATH)]
        input: PathBuf,
        #[arg(short, long, env = "SALES_REPORT_OUTPUT", default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,
        /// Write the sample dataset to INPUT if it doesn't exist instead of failing.
        #[arg(long)]
        sample_fallback: bool,
        /// Skip rows with a negative quantity or unit price.
        #[arg(long)]
        reject_negative: bool,
    },
    /// Write the sample sales CSV.
    Sample {
        #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Scrape quotes and authors from a listing page.
    Quotes {
        #[arg(short, long, env = "QUOTES_URL", default_value = DEFAULT_QUOTES_URL)]
        url: String,
        /// How many pages to follow via the "Next" link.
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_QUOTE_PAGES,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..)
        )]
        pages: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Local::now();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => {
            info_time!(start_time, "Full program time:");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error_time!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Report {
            input,
            output,
            sample_fallback,
            reject_negative,
        } => {
            let config = PipelineConfig {
                input,
                output,
                sample_fallback,
                parse: ParseOptions { reject_negative },
            };
            // The pipeline is plain blocking I/O, keep it off the async workers.
            let summary =
                tokio::task::spawn_blocking(move || Pipeline::new(config).run(&SystemClock))
                    .await??;
            info_time!(
                "Total sales {:.2} over {} categories, {} rows skipped",
                summary.total_sales,
                summary.categories.len(),
                summary.rejections.len()
            );
        }
        Command::Sample { path, force } => {
            tokio::task::spawn_blocking(move || generate_sample(&path, force)).await??;
        }
        Command::Quotes { url, pages } => {
            println!("Web Scraper: Quotes to Scrape");
            let quotes = scrape_quotes(&url, pages).await;
            print!("{}", display_quotes(&quotes));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_pages_must_be_positive() {
        assert!(Cli::try_parse_from(["sales_report", "quotes", "--pages", "0"]).is_err());

        let cli = Cli::try_parse_from(["sales_report", "quotes", "--pages", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Quotes { pages: 3, .. }));
    }

    #[test]
    fn report_defaults_keep_fallback_off() {
        let cli = Cli::try_parse_from(["sales_report", "report"]).unwrap();
        let Command::Report { sample_fallback, reject_negative, .. } = cli.command else {
            panic!("expected the report command");
        };
        assert!(!sample_fallback);
        assert!(!reject_negative);
    }
}
