//! SALES REPORT
//! Reads a five column sales CSV, totals it per category and writes a
//! fixed-width text report. The `quotes` side scrapes quote/author pairs
//! from a listing page and has nothing to do with the report.

mod error;
mod macros;
mod parse;
mod request;

pub mod aggregate;
pub mod pipeline;
pub mod process;
pub mod record;
pub mod report;

pub use error::{Error, Result};

pub const DEFAULT_INPUT_PATH: &str = "sales_data.csv";
pub const DEFAULT_REPORT_PATH: &str = "sales_report.txt";
pub const DEFAULT_QUOTES_URL: &str = "https://quotes.toscrape.com";
/// Pages are fetched one after another, never concurrently.
pub const DEFAULT_QUOTE_PAGES: usize = 1;
pub const CURRENCY: &str = "₹";
