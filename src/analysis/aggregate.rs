// src/analysis/aggregate.rs
//! Run-level summaries over the per-path comparison records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ChangeRecord, Difference, PathComparison};

/// How many paths the significant-differences overview keeps.
const SIGNIFICANT_PATH_LIMIT: usize = 5;

/// Count deltas above this promote a difference to significant.
const SIGNIFICANT_COUNT_DELTA: u64 = 2;

/// A path whose differences met the promotion criteria, with only those
/// differences retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantPath {
    pub url: String,
    pub differences: Vec<Difference>,
}

/// Tally of addition/deletion/reordering snippets across the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetAnalysisSummary {
    pub total_pages: usize,
    pub pages_with_additions: usize,
    pub pages_with_deletions: usize,
    pub pages_with_reordering: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub content_types: BTreeMap<String, usize>,
}

/// Count of difference records per field kind across all compared paths.
pub fn difference_type_summary(comparisons: &[PathComparison]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for comparison in comparisons {
        for difference in &comparison.differences {
            *counts.entry(difference.kind.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Promotes differences worth a first look: title changes, anything carrying
/// snippets, and large count deltas. At most the first five qualifying paths
/// are returned, in input order — selection follows discovery order, not
/// magnitude.
pub fn significant_differences(comparisons: &[PathComparison]) -> Vec<SignificantPath> {
    let mut significant = Vec::new();

    for comparison in comparisons {
        let promoted: Vec<Difference> = comparison
            .differences
            .iter()
            .filter(|difference| is_significant(difference))
            .cloned()
            .collect();

        if !promoted.is_empty() {
            significant.push(SignificantPath {
                url: comparison.url.clone(),
                differences: promoted,
            });
        }
    }

    significant.truncate(SIGNIFICANT_PATH_LIMIT);
    significant
}

fn is_significant(difference: &Difference) -> bool {
    if difference.kind == crate::models::DifferenceKind::Title {
        return true;
    }
    if !difference.snippets.is_empty() {
        return true;
    }
    matches!(
        difference.site1.count_delta(&difference.site2),
        Some(delta) if delta > SIGNIFICANT_COUNT_DELTA
    )
}

/// Scans every snippet of every difference, tallying per-path booleans and
/// per-content-type totals for additions and deletions.
pub fn offset_analysis_summary(comparisons: &[PathComparison]) -> OffsetAnalysisSummary {
    let mut summary = OffsetAnalysisSummary {
        total_pages: comparisons.len(),
        ..Default::default()
    };

    for comparison in comparisons {
        let mut has_additions = false;
        let mut has_deletions = false;
        let mut has_reordering = false;

        for difference in &comparison.differences {
            for snippet in &difference.snippets {
                match snippet {
                    ChangeRecord::Addition { content_type, count, .. } => {
                        has_additions = true;
                        summary.total_additions += count;
                        *summary.content_types.entry(content_type.clone()).or_insert(0) += count;
                    }
                    ChangeRecord::Deletion { content_type, count, .. } => {
                        has_deletions = true;
                        summary.total_deletions += count;
                        *summary.content_types.entry(content_type.clone()).or_insert(0) += count;
                    }
                    ChangeRecord::Reordering { .. } => {
                        has_reordering = true;
                    }
                    _ => {}
                }
            }
        }

        if has_additions {
            summary.pages_with_additions += 1;
        }
        if has_deletions {
            summary.pages_with_deletions += 1;
        }
        if has_reordering {
            summary.pages_with_reordering += 1;
        }
    }

    summary
}
