//! HTTP capability used by the fetch and enrichment collaborators.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config;
use crate::error::{PricerError, Result};

/// Fetch a URL's body as text.
///
/// Injected into [`CatalogFetcher`](super::CatalogFetcher) and
/// [`ImageEnricher`](crate::enrich::ImageEnricher) so callers (and tests) can
/// supply their own transport.
pub trait HttpFetch: Send + Sync {
    fn get_text(&self, url: &str) -> Result<String>;
}

/// [`HttpFetch`] over a blocking reqwest client.
///
/// Create and drop it outside an async runtime (or on its blocking pool).
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PricerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text()?)
    }
}
