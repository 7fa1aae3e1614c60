//! cardscan-ingest: statement ingestion — PDF text extraction, the regex
//! transaction parser, and CSV snapshot read/write.

pub mod csv_io;
pub mod parser;
pub mod pdf;

pub use csv_io::{read_transactions, write_transactions};
pub use parser::parse_transactions;
pub use pdf::extract_statement_text;
