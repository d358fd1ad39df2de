// src/analysis/sequence.rs
//! Sequence reconciliation for ordered page content.
//!
//! Naive position-by-position comparison reports every element after an
//! insertion as "changed". This matcher instead reconciles the two sides as
//! keyed sets (additions/deletions) and derives a separate reorder signal
//! from the longest common subsequence of the key sequences, so a single
//! inserted heading shows up as one addition rather than a wall of noise.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::models::{ChangeRecord, ContentDiffResult, Snippet};

/// Characters kept per one-sided addition/deletion snippet.
const CHANGE_SNIPPET_LEN: usize = 150;

/// Projects a content element onto its comparison key: trimmed, internal
/// whitespace collapsed, case-folded.
pub fn comparison_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceMatcher;

impl SequenceMatcher {
    pub fn new() -> Self {
        SequenceMatcher
    }

    /// Reconciles two ordered sequences of `content_type` elements.
    ///
    /// A key present on both sides is a match regardless of multiplicity.
    /// Keys present on one side only become addition/deletion records
    /// carrying every original item grouped under the key. The reorder
    /// signal fires when the LCS of the key sequences falls short of the
    /// shorter side; an addition or deletion alone also shortens the LCS,
    /// so the signal does not distinguish true transpositions from
    /// insertion/deletion shift.
    pub fn diff(&self, items1: &[String], items2: &[String], content_type: &str) -> ContentDiffResult {
        let keys1: Vec<String> = items1.iter().map(|item| comparison_key(item)).collect();
        let keys2: Vec<String> = items2.iter().map(|item| comparison_key(item)).collect();

        let (order1, groups1) = group_by_key(items1, &keys1);
        let (order2, groups2) = group_by_key(items2, &keys2);

        let matched: HashSet<&String> = order1
            .iter()
            .filter(|key| groups2.contains_key(key.as_str()))
            .collect();

        let mut additions = Vec::new();
        for key in &order2 {
            if matched.contains(key) {
                continue;
            }
            let items = groups2[key.as_str()].clone();
            additions.push(ChangeRecord::Addition {
                content_type: content_type.to_string(),
                count: items.len(),
                snippet: Snippet::clipped("", &items[0], CHANGE_SNIPPET_LEN),
                items,
            });
        }

        let mut deletions = Vec::new();
        for key in &order1 {
            if matched.contains(key) {
                continue;
            }
            let items = groups1[key.as_str()].clone();
            deletions.push(ChangeRecord::Deletion {
                content_type: content_type.to_string(),
                count: items.len(),
                snippet: Snippet::clipped(&items[0], "", CHANGE_SNIPPET_LEN),
                items,
            });
        }

        let lcs = lcs_length(&keys1, &keys2);
        let shorter = keys1.len().min(keys2.len());
        let reordered = lcs < shorter;

        let mut differences = Vec::new();
        if reordered {
            let count = shorter - lcs;
            differences.push(ChangeRecord::Reordering {
                content_type: content_type.to_string(),
                count,
                description: format!("{} {}s appear to be reordered", count, content_type),
            });
        }

        ContentDiffResult {
            differences,
            additions,
            deletions,
            matches: matched.len(),
            reordered,
        }
    }
}

/// Groups original items under their comparison key, preserving the order in
/// which keys first appear. Duplicate keys keep every original item.
fn group_by_key(items: &[String], keys: &[String]) -> (Vec<String>, HashMap<String, Vec<String>>) {
    let mut order = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for (item, key) in items.iter().zip(keys) {
        match groups.entry(key.clone()) {
            Entry::Vacant(slot) => {
                order.push(key.clone());
                slot.insert(vec![item.clone()]);
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(item.clone()),
        }
    }

    (order, groups)
}

/// Length of the longest common subsequence of the two key sequences, via
/// the standard O(|a|·|b|) dynamic-programming table.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let (m, n) = (a.len(), b.len());
    let mut table = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    table[m][n]
}
