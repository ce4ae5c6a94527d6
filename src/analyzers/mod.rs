//! Sales aggregation.
//!
//! This module groups filtered sales records into per-state, per-month,
//! per-category and per-seller summaries, and composes them into the
//! full dashboard report.

pub mod aggregate;
pub mod dashboard;
pub mod types;
