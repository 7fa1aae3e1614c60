//! Fixed-template plain-text reports.

use cardscan_core::stats::{AMOUNT_RANGE_LABELS, SpendingSummary};

/// NT$ amount with thousands separators, two decimals.
pub(crate) fn nt(amount: f64) -> String {
    let s = format!("{:.2}", amount.abs());
    // no "-0.00": drop the sign once rounding erased the magnitude
    let neg = amount < 0.0 && s != "0.00";
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    let len = int.len();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{}", if neg { "-" } else { "" }, grouped, frac)
}

/// First-pass report over freshly extracted transactions.
pub fn render_spending_report(summary: &SpendingSummary) -> String {
    let mut report = format!(
        "\
====================================
CREDIT CARD SPENDING ANALYSIS REPORT
====================================
Analysis date: {}

SUMMARY STATISTICS:
- Total Spending: NT$ {}
- Number of Transactions: {}
- Average Transaction Amount: NT$ {}

SPENDING BY CATEGORY:
",
        chrono::Local::now().format("%Y-%m-%d"),
        nt(summary.total_spending),
        summary.transaction_count,
        nt(summary.average_transaction),
    );

    for (category, amount) in &summary.category_totals {
        let pct = summary.category_percentage(*amount);
        let count = summary.count_for(category);
        report.push_str(&format!(
            "- {}: NT$ {} ({:.1}%) - {} transactions\n",
            category,
            nt(*amount),
            pct,
            count
        ));
    }

    report.push_str("\nTOP 5 TRANSACTIONS:\n");
    for (i, t) in summary.top_transactions.iter().take(5).enumerate() {
        report.push_str(&format!(
            "{}. {}: NT$ {} ({})\n",
            i + 1,
            t.description,
            nt(t.amount),
            t.category
        ));
    }

    report.push_str("\nINSIGHTS & RECOMMENDATIONS:\n");
    if let Some((largest, _)) = summary.category_totals.first() {
        report.push_str(&format!("- Largest spending category: {}\n", largest));
    }
    if let Some((frequent, _)) = summary.category_counts.first() {
        report.push_str(&format!("- Most frequent transaction category: {}\n", frequent));
    }
    report.push_str(
        "\
- Consider setting budgets for high-spending categories
- Review recurring transactions for potential savings
- Monitor transaction patterns for unusual activity

SPENDING BREAKDOWN:
",
    );

    let mut sorted = summary.category_totals.clone();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    for (category, amount) in &sorted {
        let count = summary.count_for(category);
        let avg = if count > 0 { amount / count as f64 } else { 0.0 };
        report.push_str(&format!(
            "- {}: {} transactions, avg NT$ {} per transaction\n",
            category,
            count,
            nt(avg)
        ));
    }

    report
}

/// Cleaned-pass report: median, merchant ranking, and range breakdown on top
/// of the first-pass statistics.
pub fn render_clean_report(summary: &SpendingSummary) -> String {
    let mut report = format!(
        "\
====================================
CLEANED CREDIT CARD SPENDING ANALYSIS
====================================
Analysis date: {}

SUMMARY STATISTICS:
- Total Spending: NT$ {}
- Number of Transactions: {}
- Average Transaction: NT$ {}
- Median Transaction: NT$ {}

SPENDING BY CATEGORY:
",
        chrono::Local::now().format("%Y-%m-%d"),
        nt(summary.total_spending),
        summary.transaction_count,
        nt(summary.average_transaction),
        nt(summary.median_transaction),
    );

    for (category, amount) in &summary.category_totals {
        let pct = summary.category_percentage(*amount);
        let count = summary.count_for(category);
        let avg = if count > 0 { amount / count as f64 } else { 0.0 };
        report.push_str(&format!(
            "- {}: NT$ {} ({:.1}%) - {} transactions (avg: NT$ {})\n",
            category,
            nt(*amount),
            pct,
            count,
            nt(avg)
        ));
    }

    report.push_str("\nTOP 10 TRANSACTIONS:\n");
    for (i, t) in summary.top_transactions.iter().take(10).enumerate() {
        report.push_str(&format!(
            "{:2}. {} | {:<40} | NT$ {:>12} | {}\n",
            i + 1,
            t.date,
            truncate(&t.description, 40),
            nt(t.amount),
            t.category
        ));
    }

    report.push_str("\nTOP MERCHANTS BY TOTAL SPENDING:\n");
    for (i, (merchant, amount)) in summary.top_merchants.iter().enumerate() {
        report.push_str(&format!(
            "{:2}. {:<50} | NT$ {:>12}\n",
            i + 1,
            truncate(merchant, 50),
            nt(*amount)
        ));
    }

    report.push_str("\nSPENDING INSIGHTS:\n");
    if let Some((largest, _)) = summary.category_totals.first() {
        report.push_str(&format!("- Highest spending category: {}\n", largest));
    }
    if let Some((frequent, _)) = summary.category_counts.first() {
        report.push_str(&format!("- Most frequent transaction category: {}\n", frequent));
    }
    if let Some(t) = summary.top_transactions.first() {
        report.push_str(&format!("- Largest single transaction: NT$ {}\n", nt(t.amount)));
    }

    report.push_str(
        "\
\nRECOMMENDATIONS:
1. Monitor software subscriptions - often a major expense category
2. Consider consolidating overlapping subscriptions to save costs
3. Track food delivery and dining expenses for budgeting
4. Review recurring payments for optimization opportunities
5. Set up alerts for transactions over NT$ 5,000

TRANSACTIONS BY AMOUNT RANGE:
",
    );
    for (label, count) in AMOUNT_RANGE_LABELS.iter().zip(summary.amount_ranges.iter()) {
        report.push_str(&format!("- NT$ {}: {} transactions\n", label, count));
    }

    report
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::transaction::Transaction;

    fn sample_summary() -> SpendingSummary {
        let mut txns = vec![
            Transaction::new("05/01", "星巴克信義店", 165.0),
            Transaction::new("05/02", "CURSOR USAGE MAY", 6500.0),
            Transaction::new("05/03", "UBER TRIP", 230.0),
        ];
        txns[0].category = "Food & Dining".to_string();
        txns[1].category = "Technology/Software".to_string();
        txns[2].category = "Transportation".to_string();
        SpendingSummary::compute(&txns, 10)
    }

    #[test]
    fn test_thousands_formatting() {
        assert_eq!(nt(0.0), "0.00");
        assert_eq!(nt(999.5), "999.50");
        assert_eq!(nt(1265.0), "1,265.00");
        assert_eq!(nt(4821993.25), "4,821,993.25");
        assert_eq!(nt(-14.05), "-14.05");
        assert_eq!(nt(-0.004), "0.00");
        assert_eq!(nt(-0.0), "0.00");
    }

    #[test]
    fn test_spending_report_contains_totals_and_categories() {
        let report = render_spending_report(&sample_summary());
        assert!(report.contains("Total Spending: NT$ 6,895.00"));
        assert!(report.contains("Number of Transactions: 3"));
        assert!(report.contains("Technology/Software"));
        assert!(report.contains("Largest spending category: Technology/Software"));
    }

    #[test]
    fn test_clean_report_contains_median_and_merchants() {
        let report = render_clean_report(&sample_summary());
        assert!(report.contains("Median Transaction: NT$ 230.00"));
        assert!(report.contains("TOP MERCHANTS BY TOTAL SPENDING:"));
        assert!(report.contains("CURSOR USAGE MAY"));
        assert!(report.contains("TRANSACTIONS BY AMOUNT RANGE:"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("全聯福利中心", 3), "全聯福");
        assert_eq!(truncate("short", 40), "short");
    }
}
