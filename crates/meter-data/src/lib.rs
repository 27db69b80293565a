//! Data layer for meter-report.
//!
//! Loads semicolon-separated meter exports, groups samples per day,
//! computes period summaries and persists finished reports.

pub mod aggregator;
pub mod reader;
pub mod reporter;
pub mod writer;

pub use meter_core as core;
