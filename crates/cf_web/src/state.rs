use std::sync::Arc;
use cf_cache::ConferenceCache;
use cf_core::{Config, Result};
use cf_scrapers::ConferenceScraper;

pub struct AppState {
    pub cache: ConferenceCache,
}

impl AppState {
    pub fn new(cache: ConferenceCache) -> Self {
        Self { cache }
    }

    /// Cached scraper for the configured page, on the system clock
    pub fn from_config(config: &Config) -> Result<Self> {
        let scraper = ConferenceScraper::from_config(config)?;
        Ok(Self::new(ConferenceCache::new(Arc::new(scraper), config.cache_ttl)))
    }
}
