//! Search-term report ingestion.
//!
//! Reports arrive as CSV with a header row. Tokenization is the `csv`
//! crate's job; this module turns records into name-keyed rows and offers
//! tolerant numeric parsing for the formatted values ad platforms emit.

mod numeric;
mod reader;

pub use numeric::{is_absent, parse_count, parse_decimal, NotNumeric};
pub use reader::{read_report, read_report_file, RawRow, Report, ReportError};
