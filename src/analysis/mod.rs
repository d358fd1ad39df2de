// src/analysis/mod.rs
//! The structural diff engine: sequence reconciliation, per-field
//! comparison policies, and run-level aggregation. Everything here is
//! synchronous, CPU-bound, and re-entrant; the only state is configuration.

pub mod aggregate;
pub mod fields;
pub mod sequence;

pub use aggregate::{
    difference_type_summary, offset_analysis_summary, significant_differences,
    OffsetAnalysisSummary, SignificantPath,
};
pub use fields::FieldComparators;
pub use sequence::{comparison_key, SequenceMatcher};
