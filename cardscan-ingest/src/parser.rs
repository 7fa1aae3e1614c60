//! Regex transaction parser over noisy extracted statement text.
//!
//! An ordered list of patterns is tried against the whole text; every match
//! from every pattern is collected (the patterns are not mutually exclusive
//! and carry no precedence), then the result is deduplicated by exact
//! (date, description, amount) triple.
//!
//! Expected row shapes, roughly:
//!   05/14  全聯福利中心A  1,265
//!   2025/05/14  CURSOR, AI POWERED IDE  650.00
//!   05/14  004512  星巴克信義店  165

use anyhow::Result;
use regex::Regex;

use cardscan_core::transaction::{Transaction, dedup_transactions};

/// Ordered pattern list. Group layout contract: group 1 is the date token,
/// the second-to-last group is the description, the last group is the amount.
fn pattern_set() -> [&'static str; 6] {
    [
        // MM/DD with CJK-or-ASCII description
        r"(\d{2}/\d{2})\s+([\x{4e00}-\x{9fff}\w\s\-*.]+?)\s+([\d,]+\.?\d*)",
        // YYYY/MM/DD variant
        r"(\d{4}/\d{2}/\d{2})\s+([\x{4e00}-\x{9fff}\w\s\-*.]+?)\s+([\d,]+\.?\d*)",
        // rows carrying a numeric transaction code between date and description
        r"(\d{2}/\d{2})\s+(\d+)\s+([\x{4e00}-\x{9fff}\w\s\-*.]+?)\s+([\d,]+\.?\d*)",
        // negative amounts (sign is stripped during amount cleanup)
        r"(\d{2}/\d{2})\s+([\x{4e00}-\x{9fff}\w\s\-*.]+?)\s+-?([\d,]+\.?\d*)",
        // generic catch-all for anything transaction-shaped
        r"(?s)(\d{1,2}/\d{1,2})\s+(.+?)\s+([\d,]+\.?\d*)",
        // column-aligned rows separated by runs of spaces
        r"(\d{2}/\d{2})\s{2,}([\x{4e00}-\x{9fff}\w\s\-*.]+?)\s{2,}([\d,]+\.?\d*)",
    ]
}

/// Parse transactions out of extracted statement text.
///
/// Matches that fail amount coercion are skipped with a console message.
/// Output is deduplicated by triple identity, first occurrence kept.
pub fn parse_transactions(text: &str) -> Result<Vec<Transaction>> {
    let mut txns = Vec::new();

    for (i, pattern) in pattern_set().iter().enumerate() {
        let re = Regex::new(pattern)?;
        let mut matched = 0usize;

        for caps in re.captures_iter(text) {
            matched += 1;
            let n = caps.len();
            let date = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let description = caps
                .get(n - 2)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            let amount_raw = caps.get(n - 1).map(|m| m.as_str()).unwrap_or_default();

            match coerce_amount(amount_raw) {
                Some(amount) => {
                    txns.push(Transaction::new(date, description, amount));
                }
                None => {
                    println!(
                        "Skipping match with unparseable amount {:?} ({} | {})",
                        amount_raw, date, description
                    );
                }
            }
        }

        println!("Pattern {}: {} matches", i + 1, matched);
    }

    let unique = dedup_transactions(txns);
    println!("Total unique transactions found: {}", unique.len());
    Ok(unique)
}

/// Strip everything but digits, commas and dots, drop thousands separators,
/// then parse. Empty or unparseable residue yields None.
fn coerce_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mm_dd_rows() {
        let text = "05/14  全聯福利中心  389\n05/16  星巴克信義店  165\n";
        let txns = parse_transactions(text).unwrap();
        assert!(txns.iter().any(|t| t.date == "05/14" && t.amount == 389.0));
        assert!(txns.iter().any(|t| t.description.contains("星巴克")));
    }

    #[test]
    fn test_parses_yyyy_mm_dd_rows() {
        let text = "2025/05/14  CURSOR AI POWERED IDE  650.00\n";
        let txns = parse_transactions(text).unwrap();
        assert!(
            txns.iter()
                .any(|t| t.date == "2025/05/14" && t.amount == 650.0)
        );
    }

    #[test]
    fn test_thousands_separator_coerced() {
        let text = "05/20  IKEA 宜家家居  12,480\n";
        let txns = parse_transactions(text).unwrap();
        assert!(txns.iter().any(|t| t.amount == 12480.0));
    }

    #[test]
    fn test_overlapping_patterns_dedup_to_one_row() {
        // Matched by the MM/DD, negative-amount, generic, and wide-space
        // patterns; identical triples must collapse to a single row.
        let text = "05/14   UBER TRIP   230\n";
        let txns = parse_transactions(text).unwrap();
        let hits: Vec<_> = txns
            .iter()
            .filter(|t| t.description.contains("UBER") && t.amount == 230.0)
            .collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_unique_triples_survive() {
        let text = "05/14  UBER TRIP  230\n05/15  UBER TRIP  230\n05/14  UBER TRIP  235\n";
        let txns = parse_transactions(text).unwrap();
        let uber: Vec<_> = txns.iter().filter(|t| t.description.contains("UBER")).collect();
        assert!(uber.len() >= 3, "expected all 3 distinct triples, got {}", uber.len());
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("1,265"), Some(1265.0));
        assert_eq!(coerce_amount("650.00"), Some(650.0));
        assert_eq!(coerce_amount("NT$1,000"), Some(1000.0));
        assert_eq!(coerce_amount("---"), None);
        assert_eq!(coerce_amount(""), None);
    }

    #[test]
    fn test_no_transactions_in_prose() {
        let text = "This statement is provided for your reference.\n";
        let txns = parse_transactions(text).unwrap();
        assert!(txns.is_empty());
    }
}
