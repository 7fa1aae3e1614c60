//! CSV snapshots passed between pipeline stages.
//!
//! Columns: date, description, amount, amount_abs, category.

use anyhow::{Context, Result};
use std::path::Path;

use cardscan_core::transaction::Transaction;

/// Read a transaction snapshot. `amount_abs` is recomputed when the column
/// is absent or zeroed (snapshots written by hand or by older runs).
pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut txns = Vec::new();
    for result in rdr.deserialize() {
        let mut t: Transaction =
            result.with_context(|| format!("reading row from {}", path.display()))?;
        if t.amount_abs == 0.0 && t.amount != 0.0 {
            t.amount_abs = t.amount.abs();
        }
        txns.push(t);
    }
    Ok(txns)
}

/// Write a transaction snapshot.
pub fn write_transactions(path: impl AsRef<Path>, txns: &[Transaction]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for t in txns {
        wtr.serialize(t)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cardscan-{}-{}.csv", name, std::process::id()))
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = temp_csv("roundtrip");
        let mut txns = vec![
            Transaction::new("05/14", "全聯福利中心", 389.0),
            Transaction::new("2025/05/16", "CURSOR, AI POWERED IDE", 650.0),
        ];
        txns[0].category = "Food & Dining".to_string();

        write_transactions(&path, &txns).unwrap();
        let back = read_transactions(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, txns);
    }

    #[test]
    fn test_amount_abs_recomputed_when_missing() {
        let path = temp_csv("legacy");
        std::fs::write(
            &path,
            "date,description,amount,amount_abs,category\n05/14,REFUND,-120.0,0.0,\n",
        )
        .unwrap();

        let back = read_transactions(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back[0].amount_abs, 120.0);
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let err = read_transactions("/nonexistent/transactions.csv").unwrap_err();
        assert!(format!("{err:#}").contains("transactions.csv"));
    }
}
