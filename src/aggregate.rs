use std::collections::HashMap;

use crate::record::SalesRecord;

/// Running totals over the accepted records of one run.
///
/// Forward only: there is no way to take a record back out. Categories keep the order
/// in which they were first seen.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    record_count: usize,
    categories: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, record: &SalesRecord) {
        let sale = record.sale();
        let idx = self.entry_index(record.category());
        self.categories[idx].1 += sale;
        self.record_count += 1;
    }

    /// Insert-if-absent: a category starts at zero the first time it shows up.
    fn entry_index(&mut self, category: &str) -> usize {
        if let Some(&idx) = self.index.get(category) {
            return idx;
        }
        let idx = self.categories.len();
        self.categories.push((category.to_string(), 0.0));
        self.index.insert(category.to_string(), idx);
        idx
    }

    /// Sum of the category subtotals, folded in first-seen order, so it always equals
    /// summing [`Aggregator::categories`] the same way.
    pub fn total_sales(&self) -> f64 {
        self.categories.iter().fold(0.0, |acc, (_, s)| acc + s)
    }

    /// `(category, subtotal)` in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.categories.iter().map(|(c, s)| (c.as_str(), *s))
    }

    pub fn category_total(&self, category: &str) -> Option<f64> {
        self.index.get(category).map(|&idx| self.categories[idx].1)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn into_categories(self) -> Vec<(String, f64)> {
        self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(category: &str, qty: i64, price: f64) -> SalesRecord {
        SalesRecord::new("2025-07-15", "item", category, qty, price)
    }

    #[test]
    fn totals_match_worked_example() {
        let mut agg = Aggregator::new();
        agg.accumulate(&rec("Electronics", 3, 45000.0));
        agg.accumulate(&rec("Stationery", 50, 10.0));

        assert_eq!(agg.total_sales(), 135500.0);
        assert_eq!(agg.category_total("Electronics"), Some(135000.0));
        assert_eq!(agg.category_total("Stationery"), Some(500.0));
        assert_eq!(agg.category_total("Furniture"), None);
        assert_eq!(agg.record_count(), 2);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let mut agg = Aggregator::new();
        for category in ["Zeta", "Alpha", "Zeta", "Mid", "Alpha"] {
            agg.accumulate(&rec(category, 1, 1.0));
        }
        let order: Vec<_> = agg.categories().map(|(c, _)| c).collect();
        assert_eq!(order, ["Zeta", "Alpha", "Mid"]);
        assert_eq!(agg.category_total("Zeta"), Some(2.0));
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn total_equals_sum_of_categories() {
        let mut agg = Aggregator::new();
        let rows = [
            ("Electronics", 3, 45000.0),
            ("Stationery", 50, 10.0),
            ("Furniture", 5, 1500.0),
            ("Stationery", 30, 25.0),
            ("Electronics", 2, 20000.0),
        ];
        for (c, q, p) in rows {
            agg.accumulate(&rec(c, q, p));
        }
        let sum: f64 = agg.categories().map(|(_, s)| s).sum();
        assert_eq!(agg.total_sales(), sum);
        assert_eq!(agg.total_sales(), 183750.0);
    }

    #[test]
    fn total_equals_sum_of_fractional_categories() {
        let mut agg = Aggregator::new();
        let rows = [
            ("A", 0.1),
            ("B", 0.2),
            ("A", 0.3),
            ("C", 0.7),
            ("B", 1.1),
            ("A", 2.9),
        ];
        for (c, p) in rows {
            agg.accumulate(&rec(c, 1, p));
        }
        let sum = agg.categories().fold(0.0, |acc, (_, s)| acc + s);
        assert_eq!(agg.total_sales(), sum);
        assert!((agg.total_sales() - 5.3).abs() < 1e-9);
    }

    #[test]
    fn fresh_aggregator_is_empty() {
        let agg = Aggregator::new();
        assert!(agg.is_empty());
        assert_eq!(agg.total_sales(), 0.0);
        assert_eq!(agg.categories().count(), 0);
    }
}
