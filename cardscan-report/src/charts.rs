//! Chart grids rendered with plotters onto a PNG backend.
//!
//! The overview pass gets a 2x2 grid, the cleaned pass a 2x3 grid. Individual
//! panels are small helpers over a shared drawing-area type so the grids stay
//! declarative.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

use cardscan_core::stats::{AMOUNT_RANGE_LABELS, SpendingSummary};
use cardscan_core::transaction::Transaction;

pub(crate) type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// 2x2 grid for the first extraction pass: category pie, category bars,
/// amount distribution, per-category transaction counts.
pub fn render_overview_charts(
    txns: &[Transaction],
    summary: &SpendingSummary,
    out: impl AsRef<Path>,
) -> Result<()> {
    let out = out.as_ref();
    let root = BitMapBackend::new(out, (1500, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    pie_panel(&panels[0], "Spending by Category", &summary.category_totals)?;
    bar_panel(
        &panels[1],
        "Spending Amount by Category",
        "Amount (NT$)",
        &summary.category_totals,
    )?;
    distribution_panel(&panels[2], "Transaction Amount Distribution", txns, 20)?;
    let counts: Vec<(String, f64)> = summary
        .category_counts
        .iter()
        .map(|(c, n)| (c.clone(), *n as f64))
        .collect();
    bar_panel(
        &panels[3],
        "Number of Transactions by Category",
        "Transactions",
        &counts,
    )?;

    root.present()?;
    println!("Visualization saved as '{}'", out.display());
    Ok(())
}

/// 2x3 grid for the cleaned pass: folded pie, category bars, count bars,
/// amount distribution, top merchants, amount ranges.
pub fn render_clean_charts(
    txns: &[Transaction],
    summary: &SpendingSummary,
    out: impl AsRef<Path>,
) -> Result<()> {
    let out = out.as_ref();
    let root = BitMapBackend::new(out, (1800, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 3));

    let folded = fold_small_categories(&summary.category_totals, 0.01);
    pie_panel(&panels[0], "Spending by Category", &folded)?;
    bar_panel(
        &panels[1],
        "Amount by Category",
        "Amount (NT$)",
        &summary.category_totals,
    )?;
    let counts: Vec<(String, f64)> = summary
        .category_counts
        .iter()
        .map(|(c, n)| (c.clone(), *n as f64))
        .collect();
    bar_panel(&panels[2], "Transaction Count by Category", "Transactions", &counts)?;
    distribution_panel(&panels[3], "Transaction Amount Distribution", txns, 30)?;
    let merchants: Vec<(String, f64)> =
        summary.top_merchants.iter().take(8).cloned().collect();
    hbar_panel(&panels[4], "Top Merchants by Spending", "Amount (NT$)", &merchants)?;
    let ranges: Vec<(String, f64)> = AMOUNT_RANGE_LABELS
        .iter()
        .zip(summary.amount_ranges.iter())
        .map(|(l, n)| (l.to_string(), *n as f64))
        .collect();
    bar_panel(&panels[5], "Transactions by Amount Range", "Transactions", &ranges)?;

    root.present()?;
    println!("Clean visualization saved as '{}'", out.display());
    Ok(())
}

/// Fold categories below `threshold` (fraction of the total) into a single
/// "Other (Small)" slice so pie labels stay readable.
pub(crate) fn fold_small_categories(
    data: &[(String, f64)],
    threshold: f64,
) -> Vec<(String, f64)> {
    let total: f64 = data.iter().map(|(_, v)| v).sum();
    let cutoff = total * threshold;
    let mut folded: Vec<(String, f64)> = Vec::new();
    let mut small = 0.0;
    for (label, value) in data {
        if *value > cutoff {
            folded.push((label.clone(), *value));
        } else {
            small += value;
        }
    }
    if small > 0.0 {
        folded.push(("Other (Small)".to_string(), small));
    }
    folded
}

pub(crate) fn pie_panel(panel: &Panel<'_>, title: &str, data: &[(String, f64)]) -> Result<()> {
    let area = panel.titled(title, ("sans-serif", 20).into_font())?;
    if data.is_empty() {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let radius = f64::from(w.min(h)) * 0.32;
    let sizes: Vec<f64> = data.iter().map(|(_, v)| *v).collect();
    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();
    let colors: Vec<RGBColor> = (0..data.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 12).into_font());
    pie.percentages(("sans-serif", 11).into_font());
    area.draw(&pie)?;
    Ok(())
}

pub(crate) fn bar_panel(
    panel: &Panel<'_>,
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    let max = data.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();

    let mut chart = ChartBuilder::on(panel)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(0..data.len(), 0f64..(max * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(data.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .label_style(("sans-serif", 11).into_font())
        .draw()?;

    chart.draw_series(data.iter().enumerate().map(|(i, (_, v))| {
        Rectangle::new([(i, 0.0), (i + 1, *v)], PALETTE[i % PALETTE.len()].filled())
    }))?;
    Ok(())
}

pub(crate) fn hbar_panel(
    panel: &Panel<'_>,
    title: &str,
    x_desc: &str,
    data: &[(String, f64)],
) -> Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    let max = data.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();

    let mut chart = ChartBuilder::on(panel)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(160)
        .build_cartesian_2d(0f64..(max * 1.1).max(1.0), 0..data.len())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(x_desc)
        .y_labels(data.len())
        .y_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .label_style(("sans-serif", 11).into_font())
        .draw()?;

    chart.draw_series(data.iter().enumerate().map(|(i, (_, v))| {
        Rectangle::new([(0.0, i), (*v, i + 1)], PALETTE[i % PALETTE.len()].filled())
    }))?;
    Ok(())
}

/// Histogram of `amount_abs` values bucketed into `bins` equal-width bins.
pub(crate) fn distribution_panel(
    panel: &Panel<'_>,
    title: &str,
    txns: &[Transaction],
    bins: usize,
) -> Result<()> {
    let values: Vec<f64> = txns.iter().map(|t| t.amount_abs).collect();
    let buckets = bucket_counts(&values, bins);
    bar_panel(panel, title, "Frequency", &buckets)
}

/// Equal-width bucketing; labels carry the bucket's lower bound.
pub(crate) fn bucket_counts(values: &[f64], bins: usize) -> Vec<(String, f64)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let max = values.iter().cloned().fold(0.0f64, f64::max);
    let width = (max / bins as f64).max(1.0);
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = ((v / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| (format!("{:.0}", i as f64 * width), n as f64))
        .collect()
}
