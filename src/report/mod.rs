//! Filtered reports over a user's transactions.
//!
//! This module contains:
//! - The filter-and-aggregate pipeline (`filter`, `summary`)
//! - The reports page with its chart (`page`, `chart`)
//! - The PDF export endpoint (`pdf`)

mod chart;
mod filter;
mod page;
mod pdf;
mod summary;

pub use page::get_reports_page;
pub use pdf::get_report_pdf;
pub use summary::{ReportSummary, aggregate};
