use super::actor::RaidHelperActorHandle;
use super::models::Schedule;
use crate::config::Config;
use crate::error::AppResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Raid Helper actor
#[derive(Clone)]
pub struct RaidHelperHandle {
    actor_handle: RaidHelperActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl RaidHelperHandle {
    /// Create a new RaidHelperHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        use super::actor::RaidHelperActor;

        // Create the actor and get its handle
        let (mut actor, handle) = RaidHelperActor::new(config);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Fetch the aggregated day-grouped schedule
    pub async fn fetch_schedule(&self) -> AppResult<Schedule> {
        self.actor_handle.fetch_schedule().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}
