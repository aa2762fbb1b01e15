use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// A single cached value that stops being served once its expiry passes.
///
/// The slot never refreshes itself; callers decide what to do on a miss.
#[derive(Debug)]
pub struct ExpiringSlot<V> {
    entry: RwLock<Option<Entry<V>>>,
}

impl<V: Clone> ExpiringSlot<V> {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }

    /// The stored value if `now` is still before its expiry
    pub async fn get(&self, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| now < e.expires_at)
            .map(|e| e.value.clone())
    }

    pub async fn put(&self, value: V, expires_at: DateTime<Utc>) {
        *self.entry.write().await = Some(Entry { value, expires_at });
    }

    #[cfg(test)]
    pub(crate) async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().await.as_ref().map(|e| e.expires_at)
    }
}

impl<V: Clone> Default for ExpiringSlot<V> {
    fn default() -> Self {
        Self::new()
    }
}
