use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Tuning knobs shared by the spider and the diff engine. Everything is
/// caller-supplied with defaults matching a polite release-verification run.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Maximum pages fetched per site.
    pub max_pages: usize,

    /// Maximum unique URLs admitted to the discovery queue per site.
    pub max_discovery: usize,

    /// Pause between page fetches.
    pub delay: Duration,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Tags removed wholesale before comparison.
    pub ignore_elements: HashSet<String>,

    /// Attribute names stripped from every element.
    pub ignore_attributes: HashSet<String>,

    /// Class-token fragments treated as noise. Matching is by substring, so
    /// a legitimate class that merely contains one of these fragments is
    /// dropped as well.
    pub ignore_classes: HashSet<String>,

    pub user_agent: String,

    pub output_dir: PathBuf,
}

impl Default for CompareConfig {
    fn default() -> Self {
        CompareConfig {
            max_pages: 20,
            max_discovery: 500,
            delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(30),
            ignore_elements: string_set(&["script", "noscript", "style"]),
            ignore_attributes: string_set(&["data-csrf", "csrf-token", "_token", "nonce"]),
            ignore_classes: string_set(&["timestamp", "csrf", "nonce", "random"]),
            user_agent: format!("site-drift/{}", env!("CARGO_PKG_VERSION")),
            output_dir: PathBuf::from("./site-drift-results"),
        }
    }
}

impl CompareConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_max_discovery(mut self, max_discovery: usize) -> Self {
        self.max_discovery = max_discovery;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ignore_elements<I: IntoIterator<Item = String>>(mut self, tags: I) -> Self {
        self.ignore_elements = tags.into_iter().collect();
        self
    }

    pub fn with_ignore_attributes<I: IntoIterator<Item = String>>(mut self, attrs: I) -> Self {
        self.ignore_attributes = attrs.into_iter().collect();
        self
    }

    pub fn with_ignore_classes<I: IntoIterator<Item = String>>(mut self, classes: I) -> Self {
        self.ignore_classes = classes.into_iter().collect();
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }
}

fn string_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
