use async_trait::async_trait;
use crate::types::{RawScheduleItem, Speaker};
use crate::Result;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Retrieve the full HTML document of the conference page
    async fn fetch_page(&self) -> Result<String>;
}

/// Anything that can produce freshly extracted conference data.
///
/// Every call is expected to hit the upstream page; caching happens one
/// layer above.
#[async_trait]
pub trait ConferenceSource: Send + Sync {
    /// Speakers listed on the page, in page order
    async fn speakers(&self) -> Result<Vec<Speaker>>;

    /// Schedule rows with speakers still referenced by name
    async fn schedule(&self) -> Result<Vec<RawScheduleItem>>;
}
