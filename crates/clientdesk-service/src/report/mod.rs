//! Tabular client reports.

pub mod client_report;

pub use client_report::{ClientReportService, ReportSheet};
