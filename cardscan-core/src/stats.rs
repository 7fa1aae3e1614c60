//! Spending aggregation: the sum / mean / median / count / top-N groupbys
//! the reports and charts are built from. Everything works off `amount_abs`.

use std::collections::HashMap;

use crate::transaction::Transaction;

/// Labels for the fixed amount-range buckets, in order.
pub const AMOUNT_RANGE_LABELS: [&str; 5] = ["<100", "100-500", "500-1000", "1000-5000", "5000+"];

/// Aggregated view of one transaction set.
#[derive(Debug, Clone)]
pub struct SpendingSummary {
    pub total_spending: f64,
    pub average_transaction: f64,
    pub median_transaction: f64,
    pub transaction_count: usize,
    /// (category, total) sorted by total descending
    pub category_totals: Vec<(String, f64)>,
    /// (category, row count) sorted by count descending
    pub category_counts: Vec<(String, usize)>,
    /// Largest rows by `amount_abs`, descending
    pub top_transactions: Vec<Transaction>,
    /// (description, total) top 10, descending
    pub top_merchants: Vec<(String, f64)>,
    /// (date token, total) top 10, descending
    pub spending_by_date: Vec<(String, f64)>,
    /// Row counts for the fixed buckets in `AMOUNT_RANGE_LABELS` order
    pub amount_ranges: [usize; 5],
}

impl SpendingSummary {
    pub fn compute(txns: &[Transaction], top_n: usize) -> Self {
        let transaction_count = txns.len();
        let total_spending: f64 = txns.iter().map(|t| t.amount_abs).sum();
        let average_transaction = if transaction_count > 0 {
            total_spending / transaction_count as f64
        } else {
            0.0
        };

        // total_cmp keeps NaN amounts (hand-edited CSV input) from panicking
        let mut top_transactions: Vec<Transaction> = txns.to_vec();
        top_transactions.sort_by(|a, b| b.amount_abs.total_cmp(&a.amount_abs));
        top_transactions.truncate(top_n);

        Self {
            total_spending,
            average_transaction,
            median_transaction: median(txns),
            transaction_count,
            category_totals: grouped_totals(txns, |t| t.category.clone(), usize::MAX),
            category_counts: grouped_counts(txns),
            top_transactions,
            top_merchants: grouped_totals(txns, |t| t.description.clone(), 10),
            spending_by_date: grouped_totals(txns, |t| t.date.clone(), 10),
            amount_ranges: amount_range_counts(txns),
        }
    }

    /// Category share of total spending, in percent.
    pub fn category_percentage(&self, total: f64) -> f64 {
        if self.total_spending > 0.0 {
            (total / self.total_spending) * 100.0
        } else {
            0.0
        }
    }

    /// Row count for a category.
    pub fn count_for(&self, category: &str) -> usize {
        self.category_counts
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

fn median(txns: &[Transaction]) -> f64 {
    if txns.is_empty() {
        return 0.0;
    }
    let mut amounts: Vec<f64> = txns.iter().map(|t| t.amount_abs).collect();
    amounts.sort_by(|a, b| a.total_cmp(b));
    let mid = amounts.len() / 2;
    if amounts.len() % 2 == 0 {
        (amounts[mid - 1] + amounts[mid]) / 2.0
    } else {
        amounts[mid]
    }
}

fn grouped_totals(
    txns: &[Transaction],
    key: impl Fn(&Transaction) -> String,
    limit: usize,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for t in txns {
        *totals.entry(key(t)).or_insert(0.0) += t.amount_abs;
    }
    let mut out: Vec<(String, f64)> = totals.into_iter().collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out.truncate(limit);
    out
}

fn grouped_counts(txns: &[Transaction]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for t in txns {
        *counts.entry(t.category.clone()).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

fn amount_range_counts(txns: &[Transaction]) -> [usize; 5] {
    let mut ranges = [0usize; 5];
    for t in txns {
        let idx = match t.amount_abs {
            a if a < 100.0 => 0,
            a if a < 500.0 => 1,
            a if a < 1000.0 => 2,
            a if a < 5000.0 => 3,
            _ => 4,
        };
        ranges[idx] += 1;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(date: &str, desc: &str, amount: f64, category: &str) -> Transaction {
        let mut t = Transaction::new(date, desc, amount);
        t.category = category.to_string();
        t
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("05/01", "星巴克", 165.0, "Food & Dining"),
            txn("05/02", "CURSOR USAGE", 650.0, "Technology/Software"),
            txn("05/02", "OPENAI SUBSCR", 645.0, "Technology/Software"),
            txn("05/03", "台灣大車隊", 85.0, "Transportation"),
            txn("05/04", "錢櫃KTV", 1200.0, "Entertainment"),
        ]
    }

    #[test]
    fn test_totals_and_mean() {
        let s = SpendingSummary::compute(&sample(), 5);
        assert_eq!(s.transaction_count, 5);
        assert!((s.total_spending - 2745.0).abs() < 1e-9);
        assert!((s.average_transaction - 549.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_odd_and_even() {
        let s = SpendingSummary::compute(&sample(), 5);
        assert_eq!(s.median_transaction, 645.0);

        let even = &sample()[..4];
        let s = SpendingSummary::compute(even, 5);
        assert_eq!(s.median_transaction, (165.0 + 645.0) / 2.0);
    }

    #[test]
    fn test_category_totals_sorted_descending() {
        let s = SpendingSummary::compute(&sample(), 5);
        assert_eq!(s.category_totals[0].0, "Technology/Software");
        assert!((s.category_totals[0].1 - 1295.0).abs() < 1e-9);
        assert_eq!(s.category_totals[1].0, "Entertainment");
    }

    #[test]
    fn test_top_transactions_by_abs_amount() {
        let mut txns = sample();
        txns.push(txn("05/05", "REFUND", -2000.0, "Other"));
        let s = SpendingSummary::compute(&txns, 2);
        assert_eq!(s.top_transactions.len(), 2);
        assert_eq!(s.top_transactions[0].description, "REFUND");
        assert_eq!(s.top_transactions[1].description, "錢櫃KTV");
    }

    #[test]
    fn test_amount_range_buckets() {
        let s = SpendingSummary::compute(&sample(), 5);
        assert_eq!(s.amount_ranges, [1, 1, 2, 1, 0]);
    }

    #[test]
    fn test_nan_amounts_do_not_panic() {
        // A hand-edited snapshot can carry `amount,NaN`; every sort and the
        // median must still complete.
        let mut txns = sample();
        txns.push(txn("05/06", "NaN row", f64::NAN, "Other"));
        let s = SpendingSummary::compute(&txns, 10);
        assert_eq!(s.transaction_count, 6);
        assert!(s.top_transactions.iter().any(|t| t.description == "NaN row"));
        assert_eq!(s.category_totals.len(), 5);
    }

    #[test]
    fn test_empty_input() {
        let s = SpendingSummary::compute(&[], 10);
        assert_eq!(s.transaction_count, 0);
        assert_eq!(s.total_spending, 0.0);
        assert_eq!(s.average_transaction, 0.0);
        assert_eq!(s.median_transaction, 0.0);
        assert!(s.category_totals.is_empty());
    }
}
