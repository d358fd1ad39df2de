use site_drift::analysis::{
    comparison_key, significant_differences, FieldComparators, SequenceMatcher,
};
use site_drift::models::{ChangeRecord, DifferenceKind, FieldSummary, Image, PathComparison};

fn seq(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_swapped_headings_report_reordering_without_changes() {
    let result = SequenceMatcher::new().diff(
        &seq(&["A", "B", "C"]),
        &seq(&["B", "A", "C"]),
        "heading",
    );

    assert_eq!(result.matches, 3);
    assert!(result.additions.is_empty());
    assert!(result.deletions.is_empty());
    assert!(result.reordered);
    match &result.differences[0] {
        ChangeRecord::Reordering { count, .. } => assert_eq!(*count, 1),
        other => panic!("expected reordering record, got {:?}", other),
    }
}

#[test]
fn test_appended_heading_reports_single_addition() {
    let result =
        SequenceMatcher::new().diff(&seq(&["A", "B"]), &seq(&["A", "B", "C"]), "heading");

    assert_eq!(result.matches, 2);
    assert!(result.deletions.is_empty());
    assert_eq!(result.additions.len(), 1);
    match &result.additions[0] {
        ChangeRecord::Addition { items, count, .. } => {
            assert_eq!(items, &seq(&["C"]));
            assert_eq!(*count, 1);
        }
        other => panic!("expected addition record, got {:?}", other),
    }
}

#[test]
fn test_title_change_yields_two_sided_snippet() {
    let diff = FieldComparators::new()
        .compare_title("Home", "Home Page")
        .expect("titles differ");

    assert_eq!(diff.kind, DifferenceKind::Title);
    assert_eq!(diff.site1, FieldSummary::Text("Home".to_string()));
    assert_eq!(diff.site2, FieldSummary::Text("Home Page".to_string()));

    let snippet = diff.snippet.expect("title snippet present");
    assert_eq!(snippet.site1, "Home");
    assert_eq!(snippet.site2, "Home Page");
    assert!(snippet.site1.len() < 100 && !snippet.site1.ends_with("..."));
    assert!(snippet.site2.len() < 100 && !snippet.site2.ends_with("..."));
}

#[test]
fn test_image_src_overlap_reports_both_directions() {
    let image = |src: &str| Image {
        alt: String::new(),
        src: src.to_string(),
    };
    let diff = FieldComparators::new()
        .compare_images(&[image("x"), image("y")], &[image("y"), image("z")])
        .expect("sources differ");

    let site1_only = diff
        .snippets
        .iter()
        .find_map(|record| match record {
            ChangeRecord::ImagesOnlyInSite1 { examples, .. } => Some(examples.clone()),
            _ => None,
        })
        .expect("site1-only record");
    let site2_only = diff
        .snippets
        .iter()
        .find_map(|record| match record {
            ChangeRecord::ImagesOnlyInSite2 { examples, .. } => Some(examples.clone()),
            _ => None,
        })
        .expect("site2-only record");

    assert_eq!(site1_only, vec!["x".to_string()]);
    assert_eq!(site2_only, vec!["z".to_string()]);
    assert_eq!(diff.snippets.len(), 2);
}

#[test]
fn test_equal_form_counts_with_different_input_totals() {
    use site_drift::models::{Form, FormInput};

    let form = |inputs: usize| Form {
        action: "/submit".to_string(),
        method: "POST".to_string(),
        inputs: (0..inputs)
            .map(|i| FormInput {
                name: format!("f{}", i),
                input_type: "text".to_string(),
            })
            .collect(),
    };

    let diff = FieldComparators::new()
        .compare_forms(&[form(1), form(3)], &[form(2), form(4)])
        .expect("input totals differ");

    assert_eq!(
        diff.details,
        vec!["Different total input fields: 4 vs 6".to_string()]
    );
    assert!(diff.snippets.is_empty());
}

#[test]
fn test_same_keys_same_order_is_clean() {
    let a = seq(&["One", "Two", "Three"]);
    let b = seq(&["one", "TWO", "  three "]);
    let result = SequenceMatcher::new().diff(&a, &b, "paragraph");

    assert_eq!(result.matches, 3);
    assert!(result.additions.is_empty());
    assert!(result.deletions.is_empty());
    assert!(!result.reordered);
}

#[test]
fn test_match_partition_property() {
    use std::collections::HashSet;

    let cases: Vec<(Vec<String>, Vec<String>)> = vec![
        (seq(&[]), seq(&[])),
        (seq(&["a"]), seq(&[])),
        (seq(&["a", "b", "c"]), seq(&["c", "d"])),
        (seq(&["x", "x", "y"]), seq(&["y", "z", "z"])),
    ];

    for (a, b) in cases {
        let result = SequenceMatcher::new().diff(&a, &b, "link");
        let distinct: HashSet<String> =
            a.iter().chain(b.iter()).map(|s| comparison_key(s)).collect();
        assert_eq!(
            result.matches + result.additions.len() + result.deletions.len(),
            distinct.len(),
            "partition property failed for {:?} vs {:?}",
            a,
            b
        );
    }
}

#[test]
fn test_significant_selection_keeps_discovery_order() {
    let comparator = FieldComparators::new();

    let mut comparisons = Vec::new();
    for i in 0..7 {
        let diff = comparator
            .compare_title("Old", &format!("New {}", i))
            .expect("differs");
        comparisons.push(PathComparison {
            url: format!("/p{}", i),
            has_differences: true,
            differences: vec![diff],
        });
    }

    let significant = significant_differences(&comparisons);
    assert_eq!(significant.len(), 5);
    let urls: Vec<&str> = significant.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["/p0", "/p1", "/p2", "/p3", "/p4"]);
}
