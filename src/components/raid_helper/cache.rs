use super::models::{ServerEvents, ServerId};
use crate::error::AppResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Cache key: one entry per server id and credential pair
type CacheKey = (ServerId, String);

/// In-memory memoization of API responses.
///
/// Each `(server id, credential)` key is fetched at most once per session,
/// even when requested concurrently; the per-key `OnceCell` serializes
/// initialization. Failed fetches leave the cell empty so a later request
/// for the same key gets a fresh attempt. The whole cache is cleared at the
/// start of every user-triggered fetch action.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<ServerEvents>>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all cached responses
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Return the cached response for this key, fetching it if absent
    pub async fn get_or_fetch<F, Fut>(
        &self,
        server_id: &str,
        access_token: &str,
        fetch: F,
    ) -> AppResult<ServerEvents>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<ServerEvents>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry((server_id.to_string(), access_token.to_string()))
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_try_init(fetch).await.cloned()
    }
}
