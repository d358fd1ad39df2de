use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed view of a rendered page, built once per (markup, side) by the
/// extractor. Missing elements come through as empty strings/sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub forms: Vec<Form>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub alt: String,
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub action: String,
    pub method: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
}

/// Two-sided content excerpt attached to a difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub site1: String,
    pub site2: String,
}

impl Snippet {
    /// Builds a snippet with both sides clipped to `max_len` characters.
    pub fn clipped(site1: &str, site2: &str, max_len: usize) -> Self {
        Snippet {
            site1: clip(site1, max_len),
            site2: clip(site2, max_len),
        }
    }
}

fn clip(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max_len).collect();
        out.push_str("...");
        out
    }
}

/// One detected content change, tagged by kind for report rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChangeRecord {
    #[serde(rename = "reordering", rename_all = "camelCase")]
    Reordering {
        content_type: String,
        count: usize,
        description: String,
    },
    #[serde(rename = "addition", rename_all = "camelCase")]
    Addition {
        content_type: String,
        items: Vec<String>,
        count: usize,
        snippet: Snippet,
    },
    #[serde(rename = "deletion", rename_all = "camelCase")]
    Deletion {
        content_type: String,
        items: Vec<String>,
        count: usize,
        snippet: Snippet,
    },
    #[serde(rename = "images_only_in_site1")]
    ImagesOnlyInSite1 { count: usize, examples: Vec<String> },
    #[serde(rename = "images_only_in_site2")]
    ImagesOnlyInSite2 { count: usize, examples: Vec<String> },
}

impl ChangeRecord {
    pub fn content_type(&self) -> Option<&str> {
        match self {
            ChangeRecord::Reordering { content_type, .. }
            | ChangeRecord::Addition { content_type, .. }
            | ChangeRecord::Deletion { content_type, .. } => Some(content_type),
            _ => None,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            ChangeRecord::Reordering { count, .. }
            | ChangeRecord::Addition { count, .. }
            | ChangeRecord::Deletion { count, .. }
            | ChangeRecord::ImagesOnlyInSite1 { count, .. }
            | ChangeRecord::ImagesOnlyInSite2 { count, .. } => *count,
        }
    }
}

/// Result of reconciling two ordered content sequences. `differences` only
/// ever carries reordering records; additions/deletions are keyed by
/// one-sided presence. Consumed immediately by a field comparator.
#[derive(Debug, Clone, Default)]
pub struct ContentDiffResult {
    pub differences: Vec<ChangeRecord>,
    pub additions: Vec<ChangeRecord>,
    pub deletions: Vec<ChangeRecord>,
    pub matches: usize,
    pub reordered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    Title,
    Headings,
    Paragraphs,
    Links,
    Images,
    Forms,
}

impl std::fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DifferenceKind::Title => "title",
            DifferenceKind::Headings => "headings",
            DifferenceKind::Paragraphs => "paragraphs",
            DifferenceKind::Links => "links",
            DifferenceKind::Images => "images",
            DifferenceKind::Forms => "forms",
        };
        f.write_str(label)
    }
}

/// Per-field summary value: the raw title text, or an element count for the
/// sequence-valued fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSummary {
    Count(usize),
    Text(String),
}

impl FieldSummary {
    /// Absolute count delta between two summaries; `None` unless both sides
    /// are counts.
    pub fn count_delta(&self, other: &FieldSummary) -> Option<u64> {
        match (self, other) {
            (FieldSummary::Count(a), FieldSummary::Count(b)) => {
                Some((*a as i64 - *b as i64).unsigned_abs())
            }
            _ => None,
        }
    }
}

/// At most one per field kind per compared path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    #[serde(rename = "type")]
    pub kind: DifferenceKind,
    pub site1: FieldSummary,
    pub site2: FieldSummary,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub snippet: Option<Snippet>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub snippets: Vec<ChangeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathComparison {
    pub url: String,
    pub has_differences: bool,
    pub differences: Vec<Difference>,
}

/// Fetch failure surfaced by the caller; the path is skipped, not the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathError {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_compared: usize,
    pub pages_with_differences: usize,
    pub errors: usize,
    pub site1: String,
    pub site2: String,
    pub timestamp: String,
    pub difference_types: BTreeMap<String, usize>,
}

/// Top-level run record, serialized directly as the JSON results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub compared: usize,
    pub differences: Vec<PathComparison>,
    pub errors: Vec<PathError>,
    pub summary: RunSummary,
}
