//! SaaS subscription sub-analysis over cleaned transactions.
//!
//! Filters rows through a SaaS keyword map (first keyword wins, assigning
//! both a SaaS category and a service key), deduplicates by normalized
//! description + amount, detects the billing kind from the description, and
//! aggregates per category / service / kind.

use anyhow::{Context, Result};
use plotters::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::charts::{bar_panel, bucket_counts, hbar_panel, pie_panel};
use crate::report::nt;
use cardscan_core::transaction::Transaction;

/// Billing kind detected from the transaction description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionKind {
    #[serde(rename = "usage-based")]
    UsageBased,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "one-time")]
    OneTime,
}

impl SubscriptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionKind::UsageBased => "Usage-based",
            SubscriptionKind::Monthly => "Monthly subscription",
            SubscriptionKind::OneTime => "One-time/Other",
        }
    }
}

/// A transaction recognized as SaaS spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaasTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub amount_abs: f64,
    pub saas_category: String,
    /// Lowercase service key (see `service_display_name`)
    pub service: String,
    pub subscription: SubscriptionKind,
}

/// Ordered SaaS keyword map: (category, keywords). Keywords are matched
/// against the uppercased description; the first hit assigns both the
/// category and the service key.
fn saas_keyword_map() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("AI/ML Tools", vec!["CURSOR", "OPENAI", "ANTHROPIC", "LEONARDO", "HEYGEN"]),
        ("Design Tools", vec!["FIGMA", "ADOBE"]),
        ("Cloud Services", vec!["GOOGLE", "COLAB"]),
        ("Development Tools", vec!["REPORTDASH", "GANDI"]),
        ("Marketing Tools", vec!["MANYCHAT", "RSS.APP", "SEASALT"]),
        ("Media", vec!["SPOTIFY", "PADDLE"]),
    ]
}

/// Human-readable service name for a service key.
pub fn service_display_name(key: &str) -> &str {
    match key {
        "cursor" => "Cursor AI IDE",
        "openai" => "OpenAI (ChatGPT/API)",
        "anthropic" => "Anthropic Claude",
        "leonardo" => "Leonardo AI",
        "heygen" => "HeyGen Video AI",
        "figma" => "Figma Design",
        "adobe" => "Adobe Creative Suite",
        "google" => "Google Cloud/Services",
        "reportdash" => "ReportDash Analytics",
        "gandi" => "Gandi Domain/Hosting",
        "colab" => "Google Colab Pro",
        "manychat" => "ManyChat Marketing",
        "seasalt" => "Seasalt.AI",
        "spotify" => "Spotify Premium",
        "paddle" => "Paddle Payment",
        other => other,
    }
}

/// Detect the billing kind from description wording.
pub fn detect_subscription_kind(description: &str) -> SubscriptionKind {
    let upper = description.to_uppercase();
    if upper.contains("USAGE") {
        SubscriptionKind::UsageBased
    } else if upper.contains("SUBSCR")
        || upper.contains("PRO")
        || upper.contains("PREMIUM")
        || upper.contains("PLUS")
    {
        SubscriptionKind::Monthly
    } else {
        SubscriptionKind::OneTime
    }
}

/// Filter cleaned transactions down to SaaS spend, first keyword wins, then
/// deduplicate by normalized description + amount. Statement text sometimes
/// folds the posting date into the description, so a leading `MM/DD ` prefix
/// is stripped before comparing.
pub fn filter_saas(txns: &[Transaction]) -> Vec<SaasTransaction> {
    let date_prefix = Regex::new(r"^\d{2}/\d{2}\s+").expect("static regex");

    let mut out: Vec<SaasTransaction> = Vec::new();
    for t in txns {
        let upper = t.description.to_uppercase();
        let hit = saas_keyword_map().into_iter().find_map(|(category, keywords)| {
            keywords
                .iter()
                .find(|kw| upper.contains(**kw))
                .map(|kw| (category, kw.to_lowercase()))
        });
        if let Some((category, service)) = hit {
            out.push(SaasTransaction {
                date: t.date.clone(),
                description: t.description.clone(),
                amount: t.amount,
                amount_abs: t.amount_abs,
                saas_category: category.to_string(),
                service,
                subscription: detect_subscription_kind(&t.description),
            });
        }
    }

    let before = out.len();
    let mut seen = std::collections::HashSet::new();
    out.retain(|s| {
        let normalized = date_prefix.replace(&s.description, "").to_string();
        seen.insert(format!("{}_{}", normalized, s.amount_abs))
    });
    println!("SaaS transactions: {} -> {} after dedup", before, out.len());
    out
}

/// Aggregated SaaS spend.
#[derive(Debug, Clone)]
pub struct SaasSummary {
    pub total_spending: f64,
    pub transaction_count: usize,
    pub service_count: usize,
    pub average_transaction: f64,
    /// (category, total, count) sorted by total descending
    pub by_category: Vec<(String, f64, usize)>,
    /// (service display name, total, count) sorted by total descending
    pub by_service: Vec<(String, f64, usize)>,
    /// (kind label, total, count) sorted by total descending
    pub by_kind: Vec<(String, f64, usize)>,
}

impl SaasSummary {
    pub fn compute(txns: &[SaasTransaction]) -> Self {
        let total_spending: f64 = txns.iter().map(|t| t.amount_abs).sum();
        let transaction_count = txns.len();
        let average_transaction = if transaction_count > 0 {
            total_spending / transaction_count as f64
        } else {
            0.0
        };
        let service_count = txns
            .iter()
            .map(|t| t.service.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();

        Self {
            total_spending,
            transaction_count,
            service_count,
            average_transaction,
            by_category: grouped(txns, |t| t.saas_category.clone()),
            by_service: grouped(txns, |t| service_display_name(&t.service).to_string()),
            by_kind: grouped(txns, |t| t.subscription.label().to_string()),
        }
    }
}

fn grouped(
    txns: &[SaasTransaction],
    key: impl Fn(&SaasTransaction) -> String,
) -> Vec<(String, f64, usize)> {
    let mut acc: HashMap<String, (f64, usize)> = HashMap::new();
    for t in txns {
        let entry = acc.entry(key(t)).or_insert((0.0, 0));
        entry.0 += t.amount_abs;
        entry.1 += 1;
    }
    let mut out: Vec<(String, f64, usize)> =
        acc.into_iter().map(|(k, (total, n))| (k, total, n)).collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Fixed-template SaaS spend report.
pub fn render_saas_report(summary: &SaasSummary) -> String {
    let mut report = format!(
        "\
================================================
SAAS SERVICE SPENDING ANALYSIS
================================================
Analysis date: {}

OVERVIEW:
- Total SaaS Spending: NT$ {}
- Services in Use: {}
- Number of Transactions: {}
- Average Transaction: NT$ {}

BY SERVICE CATEGORY:
",
        chrono::Local::now().format("%Y-%m-%d"),
        nt(summary.total_spending),
        summary.service_count,
        summary.transaction_count,
        nt(summary.average_transaction),
    );

    for (category, total, count) in &summary.by_category {
        let pct = if summary.total_spending > 0.0 {
            total / summary.total_spending * 100.0
        } else {
            0.0
        };
        report.push_str(&format!(
            "- {}: NT$ {} ({:.1}%) - {} transactions\n",
            category,
            nt(*total),
            pct,
            count
        ));
    }

    report.push_str("\nTOP 10 SAAS SERVICES:\n");
    for (i, (service, total, count)) in summary.by_service.iter().take(10).enumerate() {
        let pct = if summary.total_spending > 0.0 {
            total / summary.total_spending * 100.0
        } else {
            0.0
        };
        report.push_str(&format!(
            "{:2}. {}: NT$ {} ({:.1}%) - {} transactions\n",
            i + 1,
            service,
            nt(*total),
            pct,
            count
        ));
    }

    report.push_str("\nBY BILLING KIND:\n");
    for (kind, total, count) in &summary.by_kind {
        report.push_str(&format!(
            "- {}: NT$ {} - {} transactions\n",
            kind,
            nt(*total),
            count
        ));
    }

    report.push_str(
        "\
\nCOST OPTIMIZATION:
1. Watch usage-based billing for runaway costs; set provider-side limits
2. Consolidate tools with overlapping functionality
3. Re-evaluate each subscription's ROI monthly
================================================
",
    );

    report
}

/// 2x3 SaaS chart grid: category pie, top services, billing-kind pie,
/// amount distribution, AI/ML service detail, usage-vs-subscription bars.
pub fn render_saas_charts(txns: &[SaasTransaction], out: impl AsRef<Path>) -> Result<()> {
    let out = out.as_ref();
    let summary = SaasSummary::compute(txns);

    let root = BitMapBackend::new(out, (1800, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 3));

    let by_category: Vec<(String, f64)> =
        summary.by_category.iter().map(|(c, v, _)| (c.clone(), *v)).collect();
    pie_panel(&panels[0], "SaaS Spending by Category", &by_category)?;

    let by_service: Vec<(String, f64)> = summary
        .by_service
        .iter()
        .take(10)
        .map(|(s, v, _)| (s.clone(), *v))
        .collect();
    hbar_panel(&panels[1], "Top SaaS Services", "Amount (NT$)", &by_service)?;

    let by_kind_counts: Vec<(String, f64)> = summary
        .by_kind
        .iter()
        .map(|(k, _, n)| (k.clone(), *n as f64))
        .collect();
    pie_panel(&panels[2], "Billing Kind Distribution", &by_kind_counts)?;

    let values: Vec<f64> = txns.iter().map(|t| t.amount_abs).collect();
    bar_panel(
        &panels[3],
        "SaaS Transaction Amount Distribution",
        "Frequency",
        &bucket_counts(&values, 15),
    )?;

    let ai_ml: Vec<SaasTransaction> = txns
        .iter()
        .filter(|t| t.saas_category == "AI/ML Tools")
        .cloned()
        .collect();
    let ai_by_service: Vec<(String, f64)> = SaasSummary::compute(&ai_ml)
        .by_service
        .iter()
        .map(|(s, v, _)| (s.clone(), *v))
        .collect();
    hbar_panel(&panels[4], "AI/ML Tools Detail", "Amount (NT$)", &ai_by_service)?;

    let by_kind_totals: Vec<(String, f64)> = summary
        .by_kind
        .iter()
        .map(|(k, v, _)| (k.clone(), *v))
        .collect();
    bar_panel(&panels[5], "Spending by Billing Kind", "Amount (NT$)", &by_kind_totals)?;

    root.present()?;
    println!("SaaS visualization saved as '{}'", out.display());
    Ok(())
}

/// Write the SaaS snapshot CSV.
pub fn write_saas_transactions(path: impl AsRef<Path>, txns: &[SaasTransaction]) -> Result<()> {
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
