//! Shared domain types for meter-report.
//!
//! Holds the sample and channel-set model, the error taxonomy, decimal-comma
//! and calendar formatting helpers, and the CLI settings layer.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
