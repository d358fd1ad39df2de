// src/auth.rs
//! HTTP Basic credential resolution and pre-crawl verification.
//!
//! Credentials come from the CLI first, then per-domain environment
//! variables (`COMPARATOR_USER_<KEY>` / `COMPARATOR_PASS_<KEY>` with the
//! hostname uppercased and non-alphanumerics replaced by `_`), then the
//! global `COMPARATOR_USERNAME` / `COMPARATOR_PASSWORD` pair. The probe
//! hits the site root before any crawling starts so a bad password fails
//! fast instead of producing twenty identical 401 pages.

use log::{info, warn};
use reqwest::Client;
use url::Url;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Result of the pre-crawl authentication check.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub success: bool,
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ProbeOutcome {
    fn failure(error: String) -> Self {
        ProbeOutcome {
            success: false,
            status: None,
            error: Some(error),
        }
    }
}

/// Environment-variable key fragment for a domain: hostname with every
/// non-alphanumeric character replaced by `_`, uppercased.
pub fn domain_key(domain: &str) -> String {
    let host = Url::parse(domain)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| domain.to_string());

    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Resolves credentials for `domain` with CLI values taking precedence over
/// per-domain environment variables, which take precedence over the global
/// pair. Returns `None` when nothing is configured (unauthenticated crawl).
pub fn resolve_credentials(
    domain: &str,
    cli_username: Option<&str>,
    cli_password: Option<&str>,
) -> Option<Credentials> {
    if let (Some(username), Some(password)) = (cli_username, cli_password) {
        return Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    let key = domain_key(domain);
    let username = std::env::var(format!("COMPARATOR_USER_{}", key))
        .or_else(|_| std::env::var("COMPARATOR_USERNAME"))
        .ok();
    let password = std::env::var(format!("COMPARATOR_PASS_{}", key))
        .or_else(|_| std::env::var("COMPARATOR_PASSWORD"))
        .ok();

    match (username, password) {
        (Some(username), Some(password)) => {
            info!("Using credentials from environment for {}", domain);
            Some(Credentials { username, password })
        }
        _ => None,
    }
}

/// Fetches the site root with the given credentials and decides whether the
/// crawl can proceed: 401/403 and other 4xx/5xx statuses fail, as does being
/// bounced to a login page.
pub async fn probe(client: &Client, domain: &str, credentials: &Credentials) -> ProbeOutcome {
    info!("Testing authentication for {}", domain);

    let response = match client
        .get(domain)
        .basic_auth(&credentials.username, Some(&credentials.password))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!("Authentication test failed for {}: {}", domain, e);
            return ProbeOutcome::failure(e.to_string());
        }
    };

    let status = response.status().as_u16();
    let final_url = response.url().to_string();

    let error = if status == 401 {
        Some("Invalid credentials - received 401 Unauthorized".to_string())
    } else if status == 403 {
        Some("Access forbidden - received 403 Forbidden".to_string())
    } else if status >= 400 {
        Some(format!(
            "HTTP {}: {}",
            status,
            response.status().canonical_reason().unwrap_or("error")
        ))
    } else if final_url.to_lowercase().contains("login") && !domain.to_lowercase().contains("login")
    {
        Some("Redirected to login page - authentication may be required".to_string())
    } else {
        None
    };

    match error {
        Some(error) => {
            warn!("Authentication test failed for {}: {}", domain, error);
            ProbeOutcome {
                success: false,
                status: Some(status),
                error: Some(error),
            }
        }
        None => {
            info!("Authentication test passed for {} (HTTP {})", domain, status);
            ProbeOutcome {
                success: true,
                status: Some(status),
                error: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_key_derivation() {
        assert_eq!(domain_key("https://staging.example.com"), "STAGING_EXAMPLE_COM");
        assert_eq!(domain_key("https://shop-eu.example.com:8443/path"), "SHOP_EU_EXAMPLE_COM");
        assert_eq!(domain_key("not a url"), "NOT_A_URL");
    }

    #[test]
    fn test_cli_credentials_take_precedence() {
        let creds = resolve_credentials("https://a.test", Some("cli-user"), Some("cli-pass")).unwrap();
        assert_eq!(creds.username, "cli-user");
        assert_eq!(creds.password, "cli-pass");
    }

    #[test]
    fn test_no_configuration_means_unauthenticated() {
        assert!(resolve_credentials("https://nocreds-here.test", None, None).is_none());
    }
}
