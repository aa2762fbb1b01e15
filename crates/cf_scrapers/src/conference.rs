use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use scraper::Html;
use tracing::info;
use cf_core::{Config, ConferenceSource, PageFetcher, RawScheduleItem, Result, Speaker};

use crate::fetcher::HttpFetcher;
use crate::layouts::{ElmEuropeLayout, PageLayout};

/// Fetch-then-extract pipeline for one conference page.
///
/// Every call goes upstream; wrap it in a cache to avoid that.
pub struct ConferenceScraper {
    fetcher: Arc<dyn PageFetcher>,
    layout: Arc<dyn PageLayout>,
    timezone: Tz,
}

impl ConferenceScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, layout: Arc<dyn PageLayout>, timezone: Tz) -> Self {
        Self {
            fetcher,
            layout,
            timezone,
        }
    }

    /// HTTP fetcher and Elm Europe layout, as configured
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HttpFetcher::from_config(config)?),
            Arc::new(ElmEuropeLayout::new()?),
            config.timezone,
        ))
    }

    pub fn extract_speakers(&self, html: &str) -> Result<Vec<Speaker>> {
        let document = Html::parse_document(html);
        self.layout.extract_speakers(&document)
    }

    pub fn extract_schedule(&self, html: &str) -> Result<Vec<RawScheduleItem>> {
        let document = Html::parse_document(html);
        self.layout.extract_schedule(&document, self.timezone)
    }
}

#[async_trait]
impl ConferenceSource for ConferenceScraper {
    async fn speakers(&self) -> Result<Vec<Speaker>> {
        let html = self.fetcher.fetch_page().await?;
        let speakers = self.extract_speakers(&html)?;
        info!("🎤 Scraped {} speakers ({})", speakers.len(), self.layout.name());
        Ok(speakers)
    }

    async fn schedule(&self) -> Result<Vec<RawScheduleItem>> {
        let html = self.fetcher.fetch_page().await?;
        let items = self.extract_schedule(&html)?;
        info!("🗓️ Scraped {} schedule rows ({})", items.len(), self.layout.name());
        Ok(items)
    }
}
