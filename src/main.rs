use chrono::Utc;
use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use site_drift::analysis::{
    difference_type_summary, offset_analysis_summary, significant_differences,
};
use site_drift::auth;
use site_drift::cli::Args;
use site_drift::compare::PageComparator;
use site_drift::config::CompareConfig;
use site_drift::models::{PathError, RunReport, RunSummary};
use site_drift::reporting::{report_timestamp, write_json_results, HtmlReport};
use site_drift::spider::{PageFetch, SiteSpider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    println!(
        "{}",
        "site-drift: structural comparison for website deployments"
            .cyan()
            .bold()
    );

    let args = Args::parse();

    let config = CompareConfig::default()
        .with_max_pages(args.max_pages)
        .with_max_discovery(args.max_discovery)
        .with_delay(Duration::from_millis(args.delay))
        .with_timeout(Duration::from_millis(args.timeout))
        .with_output_dir(args.output_dir.clone());

    let scope1 = Url::parse(&args.site1)?;
    let scope2 = Url::parse(&args.site2)?;

    println!(
        "Starting comparison between:\n  Site 1: {}\n  Site 2: {}\n",
        args.site1, args.site2
    );

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?;

    // ==========================================================================
    // PHASE 0: AUTHENTICATION
    // ==========================================================================
    // Resolve and verify credentials before any crawling so a bad password
    // fails fast instead of producing a run full of 401 pages.

    let auth1 = auth::resolve_credentials(
        &args.site1,
        args.username.as_deref(),
        args.password.as_deref(),
    );
    let auth2 = auth::resolve_credentials(
        &args.site2,
        args.username.as_deref(),
        args.password.as_deref(),
    );

    for (site, credentials) in [(&args.site1, &auth1), (&args.site2, &auth2)] {
        if let Some(credentials) = credentials {
            let outcome = auth::probe(&client, site, credentials).await;
            if !outcome.success {
                let reason = outcome.error.unwrap_or_else(|| "Unknown error".to_string());
                eprintln!(
                    "{} Authentication failed for {}: {}",
                    "✗".red().bold(),
                    site,
                    reason.red()
                );
                return Err(format!("Authentication failed for {}: {}", site, reason).into());
            }
            println!("{} Authentication successful for {}", "✓".green().bold(), site);
        }
    }

    // ==========================================================================
    // PHASE 1: DISCOVERY
    // ==========================================================================

    println!("\nDiscovering pages...");

    let spider1 = SiteSpider::new(client.clone(), scope1, auth1, &config);
    let spider2 = SiteSpider::new(client.clone(), scope2, auth2, &config);

    let (pages1, pages2) = tokio::join!(spider1.discover(), spider2.discover());

    println!(
        "Found {} pages on site 1, {} pages on site 2",
        pages1.len(),
        pages2.len()
    );

    let common = common_paths(&pages1, &pages2);
    println!("\nComparing {} common paths...\n", common.len());

    // ==========================================================================
    // PHASE 2: COMPARISON
    // ==========================================================================

    let comparator = PageComparator::new(&config)?;

    let progress = ProgressBar::new(common.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )?
        .progress_chars("#>-"),
    );

    let mut compared = 0usize;
    let mut differences = Vec::new();
    let mut errors = Vec::new();

    for path in &common {
        let page1 = find_fetch(&pages1, path);
        let page2 = find_fetch(&pages2, path);

        match (page1, page2) {
            (Some(page1), Some(page2)) => {
                match (&page1.content, &page2.content) {
                    (Some(markup1), Some(markup2)) => {
                        let comparison = comparator.compare_page(
                            path, markup1, markup2, &args.site1, &args.site2,
                        );
                        compared += 1;

                        if comparison.has_differences {
                            progress.println(format!(
                                "{} {}: {} differences found",
                                "✗".red(),
                                path,
                                comparison.differences.len()
                            ));
                            differences.push(comparison);
                        } else {
                            progress.println(format!(
                                "{} {}: no significant differences",
                                "✓".green(),
                                path
                            ));
                        }
                    }
                    _ => {
                        // Missing content on either side skips this path
                        // only; the rest of the run proceeds.
                        let error = page1
                            .error
                            .clone()
                            .or_else(|| page2.error.clone())
                            .unwrap_or_else(|| "Unknown error".to_string());
                        progress.println(format!("{} {}: {}", "!".yellow(), path, error));
                        errors.push(PathError {
                            path: path.clone(),
                            error,
                        });
                    }
                }
            }
            _ => warn!("Common path {} disappeared from the page lists", path),
        }

        progress.inc(1);
    }

    progress.finish_with_message("Comparison complete");

    // ==========================================================================
    // PHASE 3: SUMMARY & REPORTS
    // ==========================================================================

    let summary = RunSummary {
        total_compared: compared,
        pages_with_differences: differences.len(),
        errors: errors.len(),
        site1: args.site1.clone(),
        site2: args.site2.clone(),
        timestamp: Utc::now().to_rfc3339(),
        difference_types: difference_type_summary(&differences),
    };

    let report = RunReport {
        compared,
        differences,
        errors,
        summary,
    };

    let significant = significant_differences(&report.differences);
    let offsets = offset_analysis_summary(&report.differences);

    println!("\n{}", "Comparison Summary".bold().underline());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Path", "Differences", "Fields"]);

    for comparison in &report.differences {
        let fields: Vec<String> = comparison
            .differences
            .iter()
            .map(|difference| difference.kind.to_string())
            .collect();
        table.add_row(vec![
            comparison.url.clone(),
            comparison.differences.len().to_string(),
            fields.join(", "),
        ]);
    }

    println!("{table}");

    std::fs::create_dir_all(&config.output_dir)?;
    let stamp = report_timestamp();

    let json_path = config.output_dir.join(format!("results-{}.json", stamp));
    write_json_results(&report, &json_path)?;
    info!("Wrote JSON results to {}", json_path.display());

    let html = HtmlReport::render(&report, &significant, &offsets);
    let html_path = config.output_dir.join(format!("report-{}.html", stamp));
    html.write_to_file(&html_path)?;
    info!("Wrote HTML report to {}", html_path.display());

    println!("\n{}", "Comparison Complete:".bold());
    println!("   Total pages compared: {}", report.summary.total_compared);
    println!(
        "   Pages with differences: {}",
        report.summary.pages_with_differences
    );
    println!("   Errors encountered: {}", report.summary.errors);
    println!("   Results saved to: {}", config.output_dir.display());

    Ok(())
}

/// Paths present on both sites, in side-1 discovery order.
fn common_paths(pages1: &[(String, PageFetch)], pages2: &[(String, PageFetch)]) -> Vec<String> {
    let paths2: HashSet<String> = pages2
        .iter()
        .filter_map(|(url, _)| url_path(url))
        .collect();

    let mut seen = HashSet::new();
    pages1
        .iter()
        .filter_map(|(url, _)| url_path(url))
        .filter(|path| seen.insert(path.clone()))
        .filter(|path| paths2.contains(path))
        .collect()
}

fn find_fetch<'a>(pages: &'a [(String, PageFetch)], path: &str) -> Option<&'a PageFetch> {
    pages
        .iter()
        .find(|(url, _)| url_path(url).as_deref() == Some(path))
        .map(|(_, fetch)| fetch)
}

fn url_path(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|url| url.path().to_string())
}
