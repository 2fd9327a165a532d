use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::aggregate::Aggregator;
use crate::record::SalesRecord;
use crate::CURRENCY;

pub const REPORT_TITLE: &str = "======= AUTOMATED SALES REPORT =======";
const REPORT_FOOTER: &str = "======================================";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 70;

/// Source of the "Generated on" timestamp.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock time, so two renders of the same data differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Renders the accepted records and their totals. Pure, the caller does the writing.
///
/// Column widths are minimums: a value longer than its column pushes the rest of the
/// line to the right instead of being cut.
pub fn render(records: &[SalesRecord], totals: &Aggregator, generated_at: DateTime<Local>) -> String {
    let mut out = String::with_capacity(256 + records.len() * 72);

    // Writing into a String can't fail.
    let _ = writeln!(out, "{REPORT_TITLE}");
    let _ = writeln!(out, "Generated on: {}", generated_at.format(TIMESTAMP_FMT));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<12}{:<15}{:<15}{:<5}{:<10}{:<10}",
        "Date", "Product", "Category", "Qty", "Price", "Sale"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for r in records {
        let _ = writeln!(
            out,
            "{:<12}{:<15}{:<15}{:<5}{:<10.2}{:<10.2}",
            r.date(),
            r.product(),
            r.category(),
            r.quantity(),
            r.unit_price(),
            r.sale()
        );
    }

    let _ = writeln!(out, "\n[SUMMARY]");
    let _ = writeln!(out, "Total Sales: {}", money(totals.total_sales()));
    let _ = writeln!(out, "Sales by Category:");
    for (category, amount) in totals.categories() {
        let _ = writeln!(out, "  - {category}: {}", money(amount));
    }
    let _ = writeln!(out, "{REPORT_FOOTER}");

    out
}

#[inline]
fn money(amount: f64) -> String {
    format!("{CURRENCY}{amount:.2}")
}
