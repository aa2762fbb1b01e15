use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use cf_core::{ConferenceSource, RawScheduleItem, Resource, Result, Speaker};

pub mod clock;
pub mod slot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use slot::ExpiringSlot;

/// Per-resource TTL cache in front of a [`ConferenceSource`].
///
/// A miss runs exactly one upstream scrape for the caller that observed it.
/// Concurrent misses on the same resource are not collapsed, so each may
/// scrape. Failed scrapes are never stored.
pub struct ConferenceCache {
    source: Arc<dyn ConferenceSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    speakers: ExpiringSlot<Arc<Vec<Speaker>>>,
    schedule: ExpiringSlot<Arc<Vec<RawScheduleItem>>>,
}

impl ConferenceCache {
    pub fn new(source: Arc<dyn ConferenceSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn ConferenceSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl,
            speakers: ExpiringSlot::new(),
            schedule: ExpiringSlot::new(),
        }
    }

    pub async fn speakers(&self) -> Result<Arc<Vec<Speaker>>> {
        self.cached(Resource::Speakers, &self.speakers, || self.source.speakers())
            .await
    }

    pub async fn schedule(&self) -> Result<Arc<Vec<RawScheduleItem>>> {
        self.cached(Resource::Schedule, &self.schedule, || self.source.schedule())
            .await
    }

    #[cfg(test)]
    async fn expires_at(&self, resource: Resource) -> Option<DateTime<Utc>> {
        match resource {
            Resource::Speakers => self.speakers.expires_at().await,
            Resource::Schedule => self.schedule.expires_at().await,
        }
    }

    async fn cached<V, F, Fut>(
        &self,
        resource: Resource,
        slot: &ExpiringSlot<Arc<V>>,
        load: F,
    ) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = slot.get(self.clock.now()).await {
            debug!("Serving {} from cache", resource);
            return Ok(value);
        }

        debug!("Cache miss for {}, scraping", resource);
        let value = Arc::new(load().await?);
        let expires_at = self.expiry_from(self.clock.now());
        slot.put(value.clone(), expires_at).await;
        debug!("Cached {} until {}", resource, expires_at);
        Ok(value)
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use cf_core::{Error, RawTalk, ScheduleItem};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(600);

    #[derive(Default)]
    struct CountingSource {
        speaker_calls: AtomicUsize,
        schedule_calls: AtomicUsize,
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl ConferenceSource for CountingSource {
        async fn speakers(&self) -> Result<Vec<Speaker>> {
            let call = self.speaker_calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::ScheduleText("upstream returned garbage".to_string()));
            }
            Ok(vec![Speaker {
                name: format!("Speaker #{}", call),
                image: None,
                bio: String::new(),
            }])
        }

        async fn schedule(&self) -> Result<Vec<RawScheduleItem>> {
            self.schedule_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ScheduleItem {
                title: "Keynote".to_string(),
                talk: Some(RawTalk {
                    speaker: "Speaker #0".to_string(),
                    description: String::new(),
                }),
                starts: Utc.with_ymd_and_hms(2017, 6, 8, 7, 0, 0).unwrap(),
                duration: Some(45),
            }])
        }
    }

    fn setup() -> (ConferenceCache, Arc<CountingSource>, Arc<ManualClock>) {
        let source = Arc::new(CountingSource::default());
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap()));
        let cache = ConferenceCache::with_clock(source.clone(), TTL, clock.clone());
        (cache, source, clock)
    }

    #[tokio::test]
    async fn test_hit_within_window_skips_upstream() {
        let (cache, source, clock) = setup();

        let first = cache.speakers().await.unwrap();
        clock.advance(Duration::from_secs(599));
        let second = cache.speakers().await.unwrap();

        assert_eq!(source.speaker_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            serde_json::to_string(&*first).unwrap(),
            serde_json::to_string(&*second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_expiry_triggers_exactly_one_refresh() {
        let (cache, source, clock) = setup();

        cache.speakers().await.unwrap();
        clock.advance(TTL);
        let refreshed = cache.speakers().await.unwrap();
        cache.speakers().await.unwrap();

        assert_eq!(source.speaker_calls.load(Ordering::SeqCst), 2);
        assert_eq!(refreshed[0].name, "Speaker #1");
    }

    #[tokio::test]
    async fn test_resources_cached_independently() {
        let (cache, source, _clock) = setup();

        cache.speakers().await.unwrap();
        cache.schedule().await.unwrap();
        cache.schedule().await.unwrap();

        assert_eq!(source.speaker_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.schedule_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (cache, source, _clock) = setup();
        source.failures_left.store(1, Ordering::SeqCst);

        assert!(cache.speakers().await.is_err());
        assert_eq!(cache.expires_at(Resource::Speakers).await, None);
        assert!(cache.speakers().await.is_ok());
        assert_eq!(source.speaker_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expiry_counts_from_write_time() {
        let (cache, _source, clock) = setup();

        clock.advance(Duration::from_secs(30));
        cache.schedule().await.unwrap();
        assert_eq!(
            cache.expires_at(Resource::Schedule).await,
            Some(clock.now() + chrono::Duration::seconds(600))
        );
        assert_eq!(cache.expires_at(Resource::Speakers).await, None);
    }
}
