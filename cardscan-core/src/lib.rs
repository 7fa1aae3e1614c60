//! cardscan-core: transaction record, category tables, cleaning filter,
//! and spending aggregation for credit-card statement analysis.

pub mod categories;
pub mod clean;
pub mod stats;
pub mod transaction;

pub use categories::{CategoryRule, CategoryTable};
pub use clean::CleanFilter;
pub use stats::SpendingSummary;
pub use transaction::{Transaction, dedup_transactions};
