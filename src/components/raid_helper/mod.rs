mod actor;
mod handle;
pub mod aggregate;
pub mod cache;
pub mod client;
pub mod grouping;
pub mod models;

pub use handle::RaidHelperHandle;
pub use models::{DayGroup, RaidEvent, Schedule};

use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Raid Helper component owning the fetch-aggregate-group pipeline
#[derive(Default)]
pub struct RaidHelper {
    handle: RwLock<Option<RaidHelperHandle>>,
}

impl RaidHelper {
    /// Create a new Raid Helper component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<RaidHelperHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for RaidHelper {
    fn name(&self) -> &'static str {
        "raid_helper"
    }

    async fn init(&self, config: Arc<RwLock<Config>>) -> AppResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(RaidHelperHandle::new(config));
        }

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
