use std::time::Duration;

use async_trait::async_trait;
use cf_core::{Config, PageFetcher, Result};
use tracing::debug;
use url::Url;

/// Downloads the conference page over HTTP.
///
/// Non-2xx answers are turned into errors so a maintenance page never
/// reaches the extractor.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: Url,
}

impl HttpFetcher {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("confscrape/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.source_url()?, config.fetch_timeout)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self) -> Result<String> {
        debug!("Fetching {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}
