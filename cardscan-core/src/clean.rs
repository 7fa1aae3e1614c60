//! Cleaning pass over parsed transactions.
//!
//! Drops rows with known-bad date tokens, amounts at or above the ceiling
//! (almost always regex picking up an account number or running balance),
//! and descriptions carrying undecodable-glyph markers; then deduplicates.

use crate::transaction::{Transaction, dedup_transactions};

/// Row filters applied before re-categorization.
#[derive(Debug, Clone)]
pub struct CleanFilter {
    /// Rows with `amount_abs` at or above this are dropped.
    pub max_amount: f64,
    /// Date tokens containing any of these substrings are parse artifacts.
    pub bad_date_markers: Vec<String>,
    /// Description substrings marking garbled PDF glyph output.
    pub garbage_markers: Vec<String>,
}

impl Default for CleanFilter {
    fn default() -> Self {
        Self {
            max_amount: 100_000.0,
            bad_date_markers: vec!["0/0".to_string(), "14/05".to_string()],
            garbage_markers: vec!["cid:".to_string()],
        }
    }
}

impl CleanFilter {
    /// True if the row survives every filter.
    pub fn keeps(&self, t: &Transaction) -> bool {
        if self.bad_date_markers.iter().any(|m| t.date.contains(m.as_str())) {
            return false;
        }
        if t.amount_abs >= self.max_amount {
            return false;
        }
        if self
            .garbage_markers
            .iter()
            .any(|m| t.description.contains(m.as_str()))
        {
            return false;
        }
        true
    }

    /// Filter then deduplicate, printing before/after row counts.
    pub fn clean(&self, txns: Vec<Transaction>) -> Vec<Transaction> {
        let before = txns.len();
        let kept: Vec<Transaction> = txns.into_iter().filter(|t| self.keeps(t)).collect();
        let cleaned = dedup_transactions(kept);
        println!("Cleaned transactions: {} -> {}", before, cleaned.len());
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(date: &str, desc: &str, amount: f64) -> Transaction {
        Transaction::new(date, desc, amount)
    }

    #[test]
    fn test_amount_ceiling_is_exclusive() {
        let f = CleanFilter::default();
        assert!(f.keeps(&txn("05/01", "ok", 99_999.99)));
        assert!(!f.keeps(&txn("05/01", "too big", 100_000.0)));
        assert!(!f.keeps(&txn("05/01", "way too big", 4_821_993.0)));
    }

    #[test]
    fn test_garbage_marker_dropped() {
        let f = CleanFilter::default();
        assert!(!f.keeps(&txn("05/01", "(cid:1234)(cid:88)", 120.0)));
        assert!(f.keeps(&txn("05/01", "placid lake cafe", 120.0)));
    }

    #[test]
    fn test_bad_date_tokens_dropped() {
        let f = CleanFilter::default();
        assert!(!f.keeps(&txn("0/0", "mystery", 50.0)));
        assert!(!f.keeps(&txn("14/05", "swapped day/month artifact", 50.0)));
        assert!(f.keeps(&txn("05/14", "fine", 50.0)));
    }

    #[test]
    fn test_clean_dedups_after_filtering() {
        let f = CleanFilter::default();
        let out = f.clean(vec![
            txn("05/01", "UBER EATS", 230.0),
            txn("05/01", "UBER EATS", 230.0),
            txn("0/0", "artifact", 10.0),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, "UBER EATS");
    }
}
