use std::collections::HashMap;
use std::num::{ParseFloatError, ParseIntError};

use csv::StringRecord;
use thiserror::Error;

pub const COL_DATE: &str = "Date";
pub const COL_PRODUCT: &str = "Product";
pub const COL_CATEGORY: &str = "Category";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_UNIT_PRICE: &str = "Unit_Price";

/// Header row of a well formed input file, in column order.
pub const COLUMNS: [&str; 5] = [COL_DATE, COL_PRODUCT, COL_CATEGORY, COL_QUANTITY, COL_UNIT_PRICE];

/// One untyped row as read from the input, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    line: u64,
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: HashMap::new(),
        }
    }

    /// Pairs the header names with the record's fields.
    /// A record shorter than the header just lacks the trailing columns.
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        Self { line, fields }
    }

    #[cfg(test)]
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_string(), value.to_string());
        self
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// A validated row. Fields are private so a record can't change after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    date: String,
    product: String,
    category: String,
    quantity: i64,
    unit_price: f64,
}

impl SalesRecord {
    pub fn new(
        date: impl Into<String>,
        product: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Self {
        Self {
            date: date.into(),
            product: product.into(),
            category: category.into(),
            quantity,
            unit_price,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Quantity × unit price, computed on every call.
    pub fn sale(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject rows with a negative quantity or unit price instead of passing them through.
    pub reject_negative: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{0}' is empty")]
    EmptyField(&'static str),
    #[error("invalid Quantity '{value}': {source}")]
    InvalidQuantity { value: String, source: ParseIntError },
    #[error("invalid Unit_Price '{value}': {source}")]
    InvalidUnitPrice { value: String, source: ParseFloatError },
    #[error("column '{0}' is negative")]
    Negative(&'static str),
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A skipped row and why it was skipped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {reason}")]
pub struct Rejection {
    pub line: u64,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Accepted(SalesRecord),
    Rejected(Rejection),
}

impl ParseOutcome {
    #[cfg(test)]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParseOutcome::Accepted(_))
    }
}

/// Turns a raw row into a [`SalesRecord`]. Never fails the run, a bad row comes back as
/// [`ParseOutcome::Rejected`].
pub fn parse_row(row: &RawRow, opts: &ParseOptions) -> ParseOutcome {
    match try_parse(row, opts) {
        Ok(record) => ParseOutcome::Accepted(record),
        Err(reason) => ParseOutcome::Rejected(Rejection {
            line: row.line(),
            reason,
        }),
    }
}

fn try_parse(row: &RawRow, opts: &ParseOptions) -> Result<SalesRecord, RejectReason> {
    let date = required_text(row, COL_DATE)?;
    let product = required_text(row, COL_PRODUCT)?;
    let category = required_text(row, COL_CATEGORY)?;

    let raw_qty = required(row, COL_QUANTITY)?.trim();
    let quantity = raw_qty
        .parse::<i64>()
        .map_err(|source| RejectReason::InvalidQuantity {
            value: raw_qty.to_string(),
            source,
        })?;

    let raw_price = required(row, COL_UNIT_PRICE)?.trim();
    let unit_price = raw_price
        .parse::<f64>()
        .map_err(|source| RejectReason::InvalidUnitPrice {
            value: raw_price.to_string(),
            source,
        })?;

    if opts.reject_negative {
        if quantity < 0 {
            return Err(RejectReason::Negative(COL_QUANTITY));
        }
        if unit_price < 0.0 {
            return Err(RejectReason::Negative(COL_UNIT_PRICE));
        }
    }

    Ok(SalesRecord {
        date: date.to_string(),
        product: product.to_string(),
        category: category.to_string(),
        quantity,
        unit_price,
    })
}

#[inline]
fn required<'a>(row: &'a RawRow, column: &'static str) -> Result<&'a str, RejectReason> {
    row.get(column).ok_or(RejectReason::MissingColumn(column))
}

/// Present and not just whitespace. The value itself is kept untrimmed.
#[inline]
fn required_text<'a>(row: &'a RawRow, column: &'static str) -> Result<&'a str, RejectReason> {
    let value = required(row, column)?;
    if value.trim().is_empty() {
        return Err(RejectReason::EmptyField(column));
    }
    Ok(value)
}
