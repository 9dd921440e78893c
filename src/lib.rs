//! Summarize combined-format web server access logs.
//!
//! Lines are parsed into [`parser::LogRecord`]s, aggregated into top client
//! addresses, top user agents and per-status counts by [`analyzer::analyze`],
//! and written out as a static HTML report by [`report`].

pub mod analyzer;
pub mod error;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use analyzer::{analyze, RankedItem, StatusCounts, Summary, TopNList};
pub use error::ReportError;
pub use parser::{parse_log_line, LogRecord};
pub use pipeline::RunOptions;
