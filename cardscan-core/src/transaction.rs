//! The flat transaction record shared by every pipeline stage.
//!
//! Dates stay free-text (`MM/DD` or `YYYY/MM/DD` tokens straight out of the
//! statement); only the amount is required to parse as a number.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One statement row. Persisted between pipeline stages as a CSV snapshot
/// with exactly these columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Free-text date token as printed on the statement
    pub date: String,
    /// Merchant / memo text, possibly containing garbled glyph runs
    pub description: String,
    /// Signed amount
    pub amount: f64,
    /// Absolute amount, used for all spending aggregation
    #[serde(default)]
    pub amount_abs: f64,
    /// Category label assigned by keyword match; empty until categorized
    #[serde(default)]
    pub category: String,
}

impl Transaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            amount_abs: amount.abs(),
            category: String::new(),
        }
    }

    /// Identity used for deduplication. Two rows are the same transaction
    /// only if the triple is byte-identical (amounts compared by bit pattern).
    pub fn dedup_key(&self) -> (String, String, u64) {
        (self.date.clone(), self.description.clone(), self.amount.to_bits())
    }
}

/// Drop duplicate `(date, description, amount)` triples, keeping the first
/// occurrence and preserving input order. A row whose triple is unique is
/// never dropped.
pub fn dedup_transactions(txns: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    txns.into_iter()
        .filter(|t| seen.insert(t.dedup_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_abs_derived() {
        let t = Transaction::new("05/14", "REFUND", -120.0);
        assert_eq!(t.amount_abs, 120.0);
        assert!(t.category.is_empty());
    }

    #[test]
    fn test_dedup_drops_identical_triples_only() {
        let txns = vec![
            Transaction::new("05/01", "CURSOR USAGE", 650.0),
            Transaction::new("05/01", "CURSOR USAGE", 650.0),
            Transaction::new("05/01", "CURSOR USAGE", 651.0),
            Transaction::new("05/02", "CURSOR USAGE", 650.0),
        ];
        let unique = dedup_transactions(txns);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].amount, 650.0);
        assert_eq!(unique[1].amount, 651.0);
        assert_eq!(unique[2].date, "05/02");
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let txns = vec![
            Transaction::new("05/03", "B", 2.0),
            Transaction::new("05/01", "A", 1.0),
            Transaction::new("05/03", "B", 2.0),
        ];
        let unique = dedup_transactions(txns);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].description, "B");
        assert_eq!(unique[1].description, "A");
    }

    #[test]
    fn test_csv_snapshot_fields_serialize() {
        let mut t = Transaction::new("2025/05/14", "全聯福利中心", 389.0);
        t.category = "Food & Dining".to_string();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("amount_abs"));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
