// src/analysis/fields.rs
//! Per-field comparison policies. Each comparator emits at most one
//! [`Difference`] per field kind for a compared path, or `None` when the
//! field is equivalent on both sides.

use std::collections::HashSet;

use crate::analysis::sequence::SequenceMatcher;
use crate::models::{
    ChangeRecord, Difference, DifferenceKind, FieldSummary, Form, Image, Snippet,
};

/// Characters kept per side of the title snippet.
const TITLE_SNIPPET_LEN: usize = 100;

/// Static wording and caps for a sequence-valued field.
struct SequenceField {
    kind: DifferenceKind,
    /// Plural noun used in detail strings ("headings").
    plural: &'static str,
    /// Content-type label fed to the matcher ("heading").
    content_type: &'static str,
    /// Verb phrase for the changed-content detail line.
    changed_phrase: &'static str,
    /// Fixed detail line for the reorder signal.
    reordered_line: &'static str,
    /// Overall cap on snippets carried by the emitted difference.
    snippet_cap: Option<usize>,
}

const HEADINGS: SequenceField = SequenceField {
    kind: DifferenceKind::Headings,
    plural: "headings",
    content_type: "heading",
    changed_phrase: "have different content",
    reordered_line: "Headings appear to be reordered",
    snippet_cap: Some(5),
};

const PARAGRAPHS: SequenceField = SequenceField {
    kind: DifferenceKind::Paragraphs,
    plural: "paragraphs",
    content_type: "paragraph",
    changed_phrase: "have different content",
    reordered_line: "Paragraphs appear to be reordered",
    snippet_cap: Some(3),
};

const LINKS: SequenceField = SequenceField {
    kind: DifferenceKind::Links,
    plural: "links",
    content_type: "link",
    changed_phrase: "have different text",
    reordered_line: "Links appear to be reordered",
    snippet_cap: None,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldComparators {
    matcher: SequenceMatcher,
}

impl FieldComparators {
    pub fn new() -> Self {
        FieldComparators {
            matcher: SequenceMatcher::new(),
        }
    }

    /// Exact comparison of the trimmed titles, with a two-sided snippet.
    pub fn compare_title(&self, title1: &str, title2: &str) -> Option<Difference> {
        let title1 = title1.trim();
        let title2 = title2.trim();
        if title1 == title2 {
            return None;
        }

        Some(Difference {
            kind: DifferenceKind::Title,
            site1: FieldSummary::Text(title1.to_string()),
            site2: FieldSummary::Text(title2.to_string()),
            snippet: Some(Snippet::clipped(title1, title2, TITLE_SNIPPET_LEN)),
            details: Vec::new(),
            snippets: Vec::new(),
        })
    }

    pub fn compare_headings(&self, headings1: &[String], headings2: &[String]) -> Option<Difference> {
        self.sequence_difference(&HEADINGS, headings1.len(), headings2.len(), headings1, headings2)
    }

    pub fn compare_paragraphs(
        &self,
        paragraphs1: &[String],
        paragraphs2: &[String],
    ) -> Option<Difference> {
        self.sequence_difference(
            &PARAGRAPHS,
            paragraphs1.len(),
            paragraphs2.len(),
            paragraphs1,
            paragraphs2,
        )
    }

    /// Link comparison matches on the visible text of links that have any;
    /// the summary counts still cover every link on each side.
    pub fn compare_links(
        &self,
        links1: &[crate::models::Link],
        links2: &[crate::models::Link],
    ) -> Option<Difference> {
        let texts1: Vec<String> = links1
            .iter()
            .map(|link| link.text.clone())
            .filter(|text| !text.is_empty())
            .collect();
        let texts2: Vec<String> = links2
            .iter()
            .map(|link| link.text.clone())
            .filter(|text| !text.is_empty())
            .collect();

        self.sequence_difference(&LINKS, links1.len(), links2.len(), &texts1, &texts2)
    }

    /// Images skip the sequence matcher: counts, missing-alt counts, and the
    /// exact set-difference of `src` values in each direction.
    pub fn compare_images(&self, images1: &[Image], images2: &[Image]) -> Option<Difference> {
        let mut details = Vec::new();
        let mut snippets = Vec::new();

        if images1.len() != images2.len() {
            details.push(format!(
                "Different number of images: {} vs {}",
                images1.len(),
                images2.len()
            ));
        }

        let missing_alt1 = images1.iter().filter(|img| img.alt.trim().is_empty()).count();
        let missing_alt2 = images2.iter().filter(|img| img.alt.trim().is_empty()).count();
        if missing_alt1 != missing_alt2 {
            details.push(format!(
                "Different number of images without alt text: {} vs {}",
                missing_alt1, missing_alt2
            ));
        }

        let srcs1: Vec<&str> = images1
            .iter()
            .map(|img| img.src.as_str())
            .filter(|src| !src.is_empty())
            .collect();
        let srcs2: Vec<&str> = images2
            .iter()
            .map(|img| img.src.as_str())
            .filter(|src| !src.is_empty())
            .collect();

        let set1: HashSet<&str> = srcs1.iter().copied().collect();
        let set2: HashSet<&str> = srcs2.iter().copied().collect();

        let unique1: Vec<String> = srcs1
            .iter()
            .filter(|src| !set2.contains(*src))
            .map(|src| src.to_string())
            .collect();
        let unique2: Vec<String> = srcs2
            .iter()
            .filter(|src| !set1.contains(*src))
            .map(|src| src.to_string())
            .collect();

        if !unique1.is_empty() || !unique2.is_empty() {
            details.push("Different image sources found".to_string());
            if !unique1.is_empty() {
                snippets.push(ChangeRecord::ImagesOnlyInSite1 {
                    count: unique1.len(),
                    examples: unique1.iter().take(2).cloned().collect(),
                });
            }
            if !unique2.is_empty() {
                snippets.push(ChangeRecord::ImagesOnlyInSite2 {
                    count: unique2.len(),
                    examples: unique2.iter().take(2).cloned().collect(),
                });
            }
        }

        if details.is_empty() {
            return None;
        }

        Some(Difference {
            kind: DifferenceKind::Images,
            site1: FieldSummary::Count(images1.len()),
            site2: FieldSummary::Count(images2.len()),
            snippet: None,
            details,
            snippets,
        })
    }

    /// Forms compare in aggregate only: form count, non-empty-action count,
    /// and the input total across all forms. Form identity is not tracked,
    /// so two forms with swapped input counts but an equal total are
    /// invisible here.
    pub fn compare_forms(&self, forms1: &[Form], forms2: &[Form]) -> Option<Difference> {
        let mut details = Vec::new();

        if forms1.len() != forms2.len() {
            details.push(format!(
                "Different number of forms: {} vs {}",
                forms1.len(),
                forms2.len()
            ));
        }

        let actions1 = forms1.iter().filter(|form| !form.action.is_empty()).count();
        let actions2 = forms2.iter().filter(|form| !form.action.is_empty()).count();
        if actions1 != actions2 {
            details.push(format!(
                "Different number of form actions: {} vs {}",
                actions1, actions2
            ));
        }

        let inputs1: usize = forms1.iter().map(|form| form.inputs.len()).sum();
        let inputs2: usize = forms2.iter().map(|form| form.inputs.len()).sum();
        if inputs1 != inputs2 {
            details.push(format!(
                "Different total input fields: {} vs {}",
                inputs1, inputs2
            ));
        }

        if details.is_empty() {
            return None;
        }

        Some(Difference {
            kind: DifferenceKind::Forms,
            site1: FieldSummary::Count(forms1.len()),
            site2: FieldSummary::Count(forms2.len()),
            snippet: None,
            details,
            snippets: Vec::new(),
        })
    }

    fn sequence_difference(
        &self,
        field: &SequenceField,
        count1: usize,
        count2: usize,
        items1: &[String],
        items2: &[String],
    ) -> Option<Difference> {
        let mut details = Vec::new();
        let mut snippets = Vec::new();

        if count1 != count2 {
            details.push(format!(
                "Different number of {}: {} vs {}",
                field.plural, count1, count2
            ));
        }

        let result = self.matcher.diff(items1, items2, field.content_type);

        if !result.differences.is_empty() {
            details.push(format!(
                "{} {} {}",
                result.differences.len(),
                field.plural,
                field.changed_phrase
            ));
            snippets.extend(result.differences.iter().take(3).cloned());
        }

        if !result.additions.is_empty() {
            details.push(format!("{} {} added", result.additions.len(), field.plural));
            snippets.extend(result.additions.iter().take(2).cloned());
        }

        if !result.deletions.is_empty() {
            details.push(format!("{} {} removed", result.deletions.len(), field.plural));
            snippets.extend(result.deletions.iter().take(2).cloned());
        }

        if result.reordered {
            details.push(field.reordered_line.to_string());
        }

        if details.is_empty() {
            return None;
        }

        if let Some(cap) = field.snippet_cap {
            snippets.truncate(cap);
        }

        Some(Difference {
            kind: field.kind,
            site1: FieldSummary::Count(count1),
            site2: FieldSummary::Count(count2),
            snippet: None,
            details,
            snippets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Link;

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn comparators() -> FieldComparators {
        FieldComparators::new()
    }

    #[test]
    fn test_title_difference_carries_two_sided_snippet() {
        let diff = comparators().compare_title("Home", "Home Page").unwrap();

        assert_eq!(diff.kind, DifferenceKind::Title);
        assert_eq!(diff.site1, FieldSummary::Text("Home".to_string()));
        assert_eq!(diff.site2, FieldSummary::Text("Home Page".to_string()));
        let snippet = diff.snippet.unwrap();
        assert_eq!(snippet.site1, "Home");
        assert_eq!(snippet.site2, "Home Page");
    }

    #[test]
    fn test_equal_titles_emit_nothing() {
        assert!(comparators().compare_title("  Home ", "Home").is_none());
    }

    #[test]
    fn test_heading_addition_detail_strings() {
        let diff = comparators()
            .compare_headings(&seq(&["A", "B"]), &seq(&["A", "B", "C"]))
            .unwrap();

        assert_eq!(diff.site1, FieldSummary::Count(2));
        assert_eq!(diff.site2, FieldSummary::Count(3));
        assert!(diff
            .details
            .contains(&"Different number of headings: 2 vs 3".to_string()));
        assert!(diff.details.contains(&"1 headings added".to_string()));
        assert_eq!(diff.snippets.len(), 1);
    }

    #[test]
    fn test_reordered_headings_detail_line() {
        let diff = comparators()
            .compare_headings(&seq(&["A", "B", "C"]), &seq(&["B", "A", "C"]))
            .unwrap();

        assert!(diff
            .details
            .contains(&"Headings appear to be reordered".to_string()));
        assert!(diff
            .details
            .contains(&"1 headings have different content".to_string()));
    }

    #[test]
    fn test_identical_headings_emit_nothing() {
        let headings = seq(&["A", "B"]);
        assert!(comparators().compare_headings(&headings, &headings).is_none());
    }

    #[test]
    fn test_heading_snippets_capped_at_five() {
        let many1: Vec<String> = (0..8).map(|i| format!("Old {}", i)).collect();
        let many2: Vec<String> = (0..8).map(|i| format!("New {}", i)).collect();
        let diff = comparators().compare_headings(&many1, &many2).unwrap();

        assert!(diff.snippets.len() <= 5);
    }

    #[test]
    fn test_links_match_on_non_empty_text_only() {
        let links1 = vec![
            Link { text: "Home".to_string(), href: "/".to_string() },
            Link { text: "".to_string(), href: "/icon".to_string() },
        ];
        let links2 = vec![Link { text: "Home".to_string(), href: "/".to_string() }];

        let diff = comparators().compare_links(&links1, &links2).unwrap();

        // Only the raw count differs; the matched texts are identical.
        assert_eq!(diff.site1, FieldSummary::Count(2));
        assert_eq!(diff.site2, FieldSummary::Count(1));
        assert!(diff
            .details
            .contains(&"Different number of links: 2 vs 1".to_string()));
        assert!(diff.snippets.is_empty());
    }

    #[test]
    fn test_image_src_set_difference_both_directions() {
        let images1 = vec![
            Image { alt: "x".to_string(), src: "x.png".to_string() },
            Image { alt: "y".to_string(), src: "y.png".to_string() },
        ];
        let images2 = vec![
            Image { alt: "y".to_string(), src: "y.png".to_string() },
            Image { alt: "z".to_string(), src: "z.png".to_string() },
        ];

        let diff = comparators().compare_images(&images1, &images2).unwrap();

        assert!(diff.details.contains(&"Different image sources found".to_string()));
        assert_eq!(diff.snippets.len(), 2);
        match &diff.snippets[0] {
            ChangeRecord::ImagesOnlyInSite1 { count, examples } => {
                assert_eq!(*count, 1);
                assert_eq!(examples, &vec!["x.png".to_string()]);
            }
            other => panic!("expected site1-only record, got {:?}", other),
        }
        match &diff.snippets[1] {
            ChangeRecord::ImagesOnlyInSite2 { count, examples } => {
                assert_eq!(*count, 1);
                assert_eq!(examples, &vec!["z.png".to_string()]);
            }
            other => panic!("expected site2-only record, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_alt_counts_compared() {
        let images1 = vec![Image { alt: "".to_string(), src: "a.png".to_string() }];
        let images2 = vec![Image { alt: "desc".to_string(), src: "a.png".to_string() }];

        let diff = comparators().compare_images(&images1, &images2).unwrap();
        assert!(diff
            .details
            .contains(&"Different number of images without alt text: 1 vs 0".to_string()));
    }

    #[test]
    fn test_forms_compare_input_totals_only() {
        let forms1 = vec![
            Form { action: "/a".to_string(), method: "GET".to_string(), inputs: inputs(1) },
            Form { action: "/b".to_string(), method: "GET".to_string(), inputs: inputs(3) },
        ];
        let forms2 = vec![
            Form { action: "/a".to_string(), method: "GET".to_string(), inputs: inputs(2) },
            Form { action: "/b".to_string(), method: "GET".to_string(), inputs: inputs(4) },
        ];

        let diff = comparators().compare_forms(&forms1, &forms2).unwrap();

        assert_eq!(diff.details, vec!["Different total input fields: 4 vs 6".to_string()]);
        assert!(diff.snippets.is_empty());
    }

    #[test]
    fn test_forms_with_swapped_input_counts_are_invisible() {
        let forms1 = vec![
            Form { action: "/a".to_string(), method: "GET".to_string(), inputs: inputs(1) },
            Form { action: "/b".to_string(), method: "GET".to_string(), inputs: inputs(3) },
        ];
        let forms2 = vec![
            Form { action: "/a".to_string(), method: "GET".to_string(), inputs: inputs(3) },
            Form { action: "/b".to_string(), method: "GET".to_string(), inputs: inputs(1) },
        ];

        assert!(comparators().compare_forms(&forms1, &forms2).is_none());
    }

    fn inputs(count: usize) -> Vec<crate::models::FormInput> {
        (0..count)
            .map(|i| crate::models::FormInput {
                name: format!("field{}", i),
                input_type: "text".to_string(),
            })
            .collect()
    }
}
