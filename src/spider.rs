use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::{HashSet, VecDeque};
use url::Url;
use log::{debug, info, warn};

use crate::auth::Credentials;
use crate::config::CompareConfig;

/// Outcome of fetching a single page. A missing `content` side means the
/// path cannot be compared; the error is surfaced per-path, never run-wide.
#[derive(Debug, Clone)]
pub struct PageFetch {
    pub content: Option<String>,
    pub status: Option<u16>,
    pub links: Vec<String>,
    pub error: Option<String>,
}

impl PageFetch {
    fn failed(error: String) -> Self {
        PageFetch {
            content: None,
            status: None,
            links: Vec::new(),
            error: Some(error),
        }
    }
}

/// Breadth-first page discovery over a single host. Crawl state (frontier
/// queue, discovered set, visited set) lives here; the diff engine never
/// sees it.
pub struct SiteSpider {
    client: Client,
    scope: Url,
    auth: Option<Credentials>,
    max_pages: usize,
    max_discovery: usize,
    delay: std::time::Duration,
}

impl SiteSpider {
    pub fn new(
        client: Client,
        scope: Url,
        auth: Option<Credentials>,
        config: &CompareConfig,
    ) -> Self {
        SiteSpider {
            client,
            scope,
            auth,
            max_pages: config.max_pages,
            max_discovery: config.max_discovery,
            delay: config.delay,
        }
    }

    /// Crawls from the scope root, returning fetched pages in discovery
    /// order. Bounded by the page and discovery caps; fetch failures are
    /// recorded per page and do not stop the crawl.
    pub async fn discover(&self) -> Vec<(String, PageFetch)> {
        let root = self.scope.to_string();
        let mut discovered: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<String> = VecDeque::new();
        let mut pages: Vec<(String, PageFetch)> = Vec::new();

        discovered.insert(root.clone());
        frontier.push_back(root);

        info!("Discovering pages from {}", self.scope);

        while let Some(url) = frontier.pop_front() {
            if pages.len() >= self.max_pages {
                break;
            }
            if !visited.insert(url.clone()) {
                continue;
            }

            info!("Crawling: {}", url);
            let fetch = self.fetch_page(&url).await;

            for link in &fetch.links {
                if self.admit(link, &discovered) {
                    discovered.insert(link.clone());
                    frontier.push_back(link.clone());
                    debug!("    Adding to queue: {}", link);
                }
            }

            pages.push((url, fetch));

            if pages.len() % 5 == 0 {
                info!("  Crawled {} pages from {}", pages.len(), self.scope);
            }

            if !frontier.is_empty() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            "Finished discovering {} pages from {} ({} links seen)",
            pages.len(),
            self.scope,
            discovered.len()
        );
        pages
    }

    /// Whether a harvested link joins the discovery queue: same host as the
    /// scope, not yet discovered, no fragment or query, caps not exceeded.
    fn admit(&self, link: &str, discovered: &HashSet<String>) -> bool {
        if discovered.len() >= self.max_discovery {
            return false;
        }
        if discovered.contains(link) {
            return false;
        }
        let url = match Url::parse(link) {
            Ok(url) => url,
            Err(_) => return false,
        };
        if url.fragment().is_some() || url.query().is_some() {
            return false;
        }
        url.host_str() == self.scope.host_str()
    }

    async fn fetch_page(&self, url: &str) -> PageFetch {
        let mut request = self.client.get(url);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return PageFetch::failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Error fetching {}: HTTP {}", url, status.as_u16());
            return PageFetch {
                content: None,
                status: Some(status.as_u16()),
                links: Vec::new(),
                error: Some(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("error")
                )),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return PageFetch::failed(e.to_string()),
        };

        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => return PageFetch::failed(e.to_string()),
        };
        let links = harvest_links(&body, &base);
        debug!("  Found {} links on {}", links.len(), url);

        PageFetch {
            content: Some(body),
            status: Some(status.as_u16()),
            links,
            error: None,
        }
    }
}

/// Resolves every anchor href against the page URL, keeping http(s) targets.
/// Parsing happens in its own scope so the `!Send` document never crosses an
/// await point in the caller.
fn harvest_links(body: &str, base: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let document = Html::parse_document(body);

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Ok(resolved) = base.join(href) {
                    if matches!(resolved.scheme(), "http" | "https") {
                        links.push(resolved.to_string());
                    }
                }
            }
        }
    }

    links
}
