//! Schema inference for uploaded sales tables.
//!
//! Resolves which columns hold the date, sales value and optional product,
//! region, customer, quantity, margin and cost dimensions, and grades the
//! data quality of the resolved columns.

mod detector;
mod parse;
mod report;

pub use detector::{name_score, ColumnMap, ColumnRole, SalesRecord, Schema, SchemaConfig, SchemaDetector};
pub use parse::{normalize_header, parse_date, parse_label, parse_number};
pub use report::ValidationReport;
