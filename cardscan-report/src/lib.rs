//! cardscan-report: fixed-template text reports, plotters chart grids, and
//! the SaaS subscription sub-analysis.

pub mod charts;
pub mod report;
pub mod saas;

pub use charts::{render_clean_charts, render_overview_charts};
pub use report::{render_clean_report, render_spending_report};
pub use saas::{SaasSummary, SaasTransaction, filter_saas};
