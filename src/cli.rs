use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-drift")]
#[command(version)]
#[command(
    about = "Compares two deployments of a website and reports structural content drift.",
    long_about = None
)]
pub struct Args {
    /// Base URL of the first site (e.g. https://staging.example.com).
    pub site1: String,

    /// Base URL of the second site (e.g. https://example.com).
    pub site2: String,

    /// Maximum pages to crawl per site.
    #[arg(long, default_value_t = 20)]
    pub max_pages: usize,

    /// Maximum unique links to discover per site.
    #[arg(long, default_value_t = 500)]
    pub max_discovery: usize,

    /// Delay between requests in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub delay: u64,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 30000)]
    pub timeout: u64,

    /// Directory the JSON and HTML reports are written into.
    #[arg(long, default_value = "./site-drift-results")]
    pub output_dir: PathBuf,

    /// HTTP Basic username applied to both sites (overrides environment).
    #[arg(long)]
    pub username: Option<String>,

    /// HTTP Basic password applied to both sites (overrides environment).
    #[arg(long)]
    pub password: Option<String>,
}
