// src/reporting/html.rs
//! Standalone HTML report: summary metrics, difference-type tallies,
//! content-change analysis, the most significant differences, per-page
//! detail, and the error list. Self-contained markup with inline styles so
//! the file can be mailed around or attached to a CI run.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::analysis::{OffsetAnalysisSummary, SignificantPath};
use crate::models::{ChangeRecord, Difference, FieldSummary, RunReport};

pub struct HtmlReport {
    html: String,
}

impl HtmlReport {
    pub fn render(
        report: &RunReport,
        significant: &[SignificantPath],
        offsets: &OffsetAnalysisSummary,
    ) -> Self {
        let mut out = String::with_capacity(16 * 1024);
        let summary = &report.summary;

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        out.push_str(&format!(
            "<title>Site Drift Report - {}</title>\n",
            escape(&summary.timestamp)
        ));
        out.push_str("<style>\n");
        out.push_str(REPORT_CSS);
        out.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

        out.push_str("<div class=\"header\">\n<h1>Site Drift Comparison Report</h1>\n");
        out.push_str(&format!("<p>Generated on {}</p>\n", escape(&summary.timestamp)));
        out.push_str(&format!(
            "<p><strong>Site 1:</strong> {}<br><strong>Site 2:</strong> {}</p>\n</div>\n",
            escape(&summary.site1),
            escape(&summary.site2)
        ));

        out.push_str("<div class=\"content\">\n");
        metrics_section(&mut out, report);
        type_summary_section(&mut out, report);
        offset_section(&mut out, offsets);
        significant_section(&mut out, significant);
        differences_section(&mut out, report);
        errors_section(&mut out, report);
        out.push_str("</div>\n</div>\n</body>\n</html>\n");

        HtmlReport { html: out }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path.as_ref()).context("Failed to create HTML report file")?;
        file.write_all(self.html.as_bytes())
            .context("Failed to write HTML report file")?;
        Ok(())
    }
}

fn metrics_section(out: &mut String, report: &RunReport) {
    let summary = &report.summary;
    out.push_str("<div class=\"summary\">\n");
    metric(out, "Pages Compared", &summary.total_compared.to_string());
    metric(out, "Differences Found", &summary.pages_with_differences.to_string());
    metric(out, "Errors", &summary.errors.to_string());
    out.push_str("</div>\n");
}

fn metric(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<div class=\"metric\"><h3>{}</h3><div class=\"value\">{}</div></div>\n",
        label, value
    ));
}

fn type_summary_section(out: &mut String, report: &RunReport) {
    let types = &report.summary.difference_types;
    if types.is_empty() {
        return;
    }

    out.push_str("<div class=\"section\">\n<h2>Difference Types Found</h2>\n<div class=\"grid\">\n");
    for (kind, count) in types {
        out.push_str(&format!(
            "<div class=\"tile\"><div class=\"tile-label\">{}</div><div class=\"tile-value\">{}</div></div>\n",
            escape(kind),
            count
        ));
    }
    out.push_str("</div>\n</div>\n");
}

fn offset_section(out: &mut String, offsets: &OffsetAnalysisSummary) {
    if offsets.total_pages == 0 {
        return;
    }

    out.push_str("<div class=\"section\">\n<h2>Content Change Analysis</h2>\n<div class=\"grid\">\n");
    out.push_str(&format!(
        "<div class=\"tile added\"><div class=\"tile-label\">Pages with Additions</div><div class=\"tile-value\">{}</div><div class=\"tile-note\">{} total items added</div></div>\n",
        offsets.pages_with_additions, offsets.total_additions
    ));
    out.push_str(&format!(
        "<div class=\"tile removed\"><div class=\"tile-label\">Pages with Deletions</div><div class=\"tile-value\">{}</div><div class=\"tile-note\">{} total items removed</div></div>\n",
        offsets.pages_with_deletions, offsets.total_deletions
    ));
    out.push_str(&format!(
        "<div class=\"tile moved\"><div class=\"tile-label\">Pages with Reordering</div><div class=\"tile-value\">{}</div><div class=\"tile-note\">Content order changes</div></div>\n",
        offsets.pages_with_reordering
    ));
    out.push_str("</div>\n");

    if !offsets.content_types.is_empty() {
        out.push_str("<h3>Content Changes by Type</h3>\n<div class=\"grid\">\n");
        for (content_type, count) in &offsets.content_types {
            out.push_str(&format!(
                "<div class=\"tile\"><div class=\"tile-label\">{}</div><div class=\"tile-value\">{}</div></div>\n",
                escape(content_type),
                count
            ));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn significant_section(out: &mut String, significant: &[SignificantPath]) {
    if significant.is_empty() {
        return;
    }

    out.push_str("<div class=\"section\">\n<h2>Most Significant Differences</h2>\n");
    for path in significant {
        out.push_str(&format!(
            "<div class=\"difference significant\">\n<h4>{}</h4>\n",
            escape(&path.url)
        ));
        for difference in &path.differences {
            render_difference(out, difference);
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn differences_section(out: &mut String, report: &RunReport) {
    if report.differences.is_empty() {
        out.push_str(
            "<div class=\"no-differences\"><h2>No significant differences found!</h2></div>\n",
        );
        return;
    }

    out.push_str("<div class=\"section\">\n<h2>Pages with Differences</h2>\n");
    for comparison in &report.differences {
        out.push_str(&format!(
            "<div class=\"difference\">\n<h4>{}</h4>\n",
            escape(&comparison.url)
        ));
        for difference in &comparison.differences {
            render_difference(out, difference);
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn render_difference(out: &mut String, difference: &Difference) {
    out.push_str("<div class=\"diff-item\">\n");
    out.push_str(&format!(
        "<span class=\"diff-type\">{}</span> <strong>Site 1:</strong> {} | <strong>Site 2:</strong> {}\n",
        difference.kind,
        escape(&summary_value(&difference.site1)),
        escape(&summary_value(&difference.site2))
    ));

    if let Some(snippet) = &difference.snippet {
        out.push_str(&format!(
            "<div class=\"diff-snippet\"><div class=\"snippet-label\">Content Snippet:</div><div class=\"snippet-content\"><strong>Site 1:</strong> \"{}\"<br><strong>Site 2:</strong> \"{}\"</div></div>\n",
            escape(&snippet.site1),
            escape(&snippet.site2)
        ));
    }

    if !difference.details.is_empty() {
        out.push_str("<div class=\"diff-details\"><strong>Details:</strong><br>");
        for detail in &difference.details {
            out.push_str(&format!("&bull; {}<br>", escape(detail)));
        }
        out.push_str("</div>\n");
    }

    if !difference.snippets.is_empty() {
        out.push_str("<div class=\"diff-details\"><strong>Specific Differences:</strong><br>");
        for record in &difference.snippets {
            render_change_record(out, record);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
}

fn render_change_record(out: &mut String, record: &ChangeRecord) {
    match record {
        ChangeRecord::Addition { content_type, count, snippet, .. } => {
            out.push_str(&format!(
                "&bull; <strong class=\"added-label\">Added {}{}:</strong> <span class=\"snippet-content\">\"{}\"</span><br>",
                escape(content_type),
                plural_count(*count),
                escape(&snippet.site2)
            ));
        }
        ChangeRecord::Deletion { content_type, count, snippet, .. } => {
            out.push_str(&format!(
                "&bull; <strong class=\"removed-label\">Removed {}{}:</strong> <span class=\"snippet-content\">\"{}\"</span><br>",
                escape(content_type),
                plural_count(*count),
                escape(&snippet.site1)
            ));
        }
        ChangeRecord::Reordering { description, .. } => {
            out.push_str(&format!(
                "&bull; <strong class=\"moved-label\">{}</strong><br>",
                escape(description)
            ));
        }
        ChangeRecord::ImagesOnlyInSite1 { count, examples } => {
            render_image_examples(out, "Site 1 only", *count, examples);
        }
        ChangeRecord::ImagesOnlyInSite2 { count, examples } => {
            render_image_examples(out, "Site 2 only", *count, examples);
        }
    }
}

fn render_image_examples(out: &mut String, label: &str, count: usize, examples: &[String]) {
    let quoted: Vec<String> = examples.iter().map(|src| format!("\"{}\"", escape(src))).collect();
    out.push_str(&format!(
        "&bull; <strong>{} ({} images):</strong> <span class=\"snippet-content\">{}</span><br>",
        label,
        count,
        quoted.join(", ")
    ));
}

fn errors_section(out: &mut String, report: &RunReport) {
    if report.errors.is_empty() {
        return;
    }

    out.push_str("<div class=\"section\">\n<h2>Errors Encountered</h2>\n");
    for error in &report.errors {
        out.push_str(&format!(
            "<div class=\"error\"><strong>{}:</strong> {}</div>\n",
            escape(&error.path),
            escape(&error.error)
        ));
    }
    out.push_str("</div>\n");
}

fn summary_value(value: &FieldSummary) -> String {
    match value {
        FieldSummary::Count(count) => count.to_string(),
        FieldSummary::Text(text) => text.clone(),
    }
}

fn plural_count(count: usize) -> String {
    if count > 1 {
        format!("s ({})", count)
    } else {
        String::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const REPORT_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.header { background: #2563eb; color: white; padding: 20px; border-radius: 8px 8px 0 0; }
.content { padding: 20px; }
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.metric { background: #f8fafc; padding: 15px; border-radius: 6px; text-align: center; }
.metric h3 { margin: 0 0 10px 0; color: #475569; font-size: 14px; }
.metric .value { font-size: 28px; font-weight: bold; color: #1e293b; }
.section { margin-bottom: 30px; }
.section h2 { color: #1e293b; border-bottom: 2px solid #e2e8f0; padding-bottom: 10px; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 10px; margin-top: 15px; }
.tile { background: #f8f9fa; padding: 10px; border-radius: 4px; text-align: center; }
.tile.added { border-left: 4px solid #0ea5e9; text-align: left; }
.tile.removed { border-left: 4px solid #ef4444; text-align: left; }
.tile.moved { border-left: 4px solid #f59e0b; text-align: left; }
.tile-label { font-weight: bold; color: #495057; font-size: 12px; }
.tile-value { font-size: 18px; color: #dc2626; }
.tile-note { font-size: 12px; color: #64748b; }
.difference { background: #fef2f2; border: 1px solid #fecaca; padding: 15px; margin-bottom: 15px; border-radius: 6px; }
.difference.significant { background: #fef7f0; border-color: #fdba74; }
.difference h4 { margin: 0 0 10px 0; color: #dc2626; }
.diff-item { background: white; padding: 10px; margin: 5px 0; border-radius: 4px; font-family: monospace; font-size: 12px; }
.diff-details { margin: 10px 0; padding: 10px; background: #f8f9fa; border-left: 3px solid #007bff; }
.diff-snippet { margin: 5px 0; padding: 8px; background: #fff3cd; border: 1px solid #ffeaa7; border-radius: 3px; }
.snippet-label { font-weight: bold; color: #856404; margin-bottom: 5px; }
.snippet-content { font-family: monospace; font-size: 11px; color: #495057; }
.diff-type { display: inline-block; background: #e9ecef; padding: 2px 6px; border-radius: 3px; font-size: 10px; margin-right: 10px; }
.added-label { color: #059669; }
.removed-label { color: #dc2626; }
.moved-label { color: #d97706; }
.error { background: #fffbeb; border: 1px solid #fed7aa; padding: 15px; margin-bottom: 15px; border-radius: 6px; }
.no-differences { text-align: center; padding: 40px; color: #059669; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Difference, DifferenceKind, PathComparison, PathError, RunSummary, Snippet,
    };
    use std::collections::BTreeMap;

    fn sample_report() -> RunReport {
        let title_diff = Difference {
            kind: DifferenceKind::Title,
            site1: FieldSummary::Text("Home".to_string()),
            site2: FieldSummary::Text("Home <Page>".to_string()),
            snippet: Some(Snippet::clipped("Home", "Home <Page>", 100)),
            details: Vec::new(),
            snippets: Vec::new(),
        };

        let mut difference_types = BTreeMap::new();
        difference_types.insert("title".to_string(), 1);

        RunReport {
            compared: 2,
            differences: vec![PathComparison {
                url: "/".to_string(),
                has_differences: true,
                differences: vec![title_diff],
            }],
            errors: vec![PathError {
                path: "/broken".to_string(),
                error: "HTTP 500: Internal Server Error".to_string(),
            }],
            summary: RunSummary {
                total_compared: 2,
                pages_with_differences: 1,
                errors: 1,
                site1: "https://one.test".to_string(),
                site2: "https://two.test".to_string(),
                timestamp: "2024-01-01T00:00:00+00:00".to_string(),
                difference_types,
            },
        }
    }

    #[test]
    fn test_report_contains_summary_numbers_and_sections() {
        let report = sample_report();
        let significant = crate::analysis::significant_differences(&report.differences);
        let offsets = crate::analysis::offset_analysis_summary(&report.differences);

        let html = HtmlReport::render(&report, &significant, &offsets);
        let body = html.as_str();

        assert!(body.contains("<!DOCTYPE html>"));
        assert!(body.contains("https://one.test"));
        assert!(body.contains("Pages Compared"));
        assert!(body.contains("Most Significant Differences"));
        assert!(body.contains("Errors Encountered"));
        assert!(body.contains("/broken"));
    }

    #[test]
    fn test_markup_in_content_is_escaped() {
        let report = sample_report();
        let html = HtmlReport::render(&report, &[], &OffsetAnalysisSummary::default());

        assert!(html.as_str().contains("Home &lt;Page&gt;"));
        assert!(!html.as_str().contains("Home <Page>"));
    }

    #[test]
    fn test_empty_run_renders_celebration_block() {
        let mut report = sample_report();
        report.differences.clear();
        report.summary.pages_with_differences = 0;

        let html = HtmlReport::render(&report, &[], &OffsetAnalysisSummary::default());
        assert!(html.as_str().contains("No significant differences found!"));
    }

    #[test]
    fn test_write_to_file() {
        let report = sample_report();
        let html = HtmlReport::render(&report, &[], &OffsetAnalysisSummary::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        html.write_to_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, html.as_str());
    }
}
