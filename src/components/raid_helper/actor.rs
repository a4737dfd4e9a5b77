use super::aggregate::{aggregate, FetchOutcome};
use super::cache::ResponseCache;
use super::client::RaidHelperClient;
use super::grouping::build_schedule;
use super::models::Schedule;
use crate::config::Config;
use crate::error::{component_error, AppResult};
use crate::utils::time::parse_timezone;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// The Raid Helper actor that processes messages
pub struct RaidHelperActor {
    config: Arc<RwLock<Config>>,
    cache: ResponseCache,
    command_rx: mpsc::Receiver<RaidHelperCommand>,
}

/// Commands that can be sent to the Raid Helper actor
pub enum RaidHelperCommand {
    FetchSchedule(mpsc::Sender<AppResult<Schedule>>),
    Shutdown,
}

/// Handle for communicating with the Raid Helper actor
#[derive(Clone)]
pub struct RaidHelperActorHandle {
    command_tx: mpsc::Sender<RaidHelperCommand>,
}

impl RaidHelperActorHandle {
    /// Fetch the aggregated day-grouped schedule
    pub async fn fetch_schedule(&self) -> AppResult<Schedule> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RaidHelperCommand::FetchSchedule(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(RaidHelperCommand::Shutdown).await;
        Ok(())
    }
}

impl RaidHelperActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>) -> (Self, RaidHelperActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            config,
            cache: ResponseCache::new(),
            command_rx,
        };

        let handle = RaidHelperActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop.
    ///
    /// Commands are served strictly in order, so a retriggered fetch queues
    /// behind the in-flight one and its reply is the one the presentation
    /// layer reads last.
    pub async fn run(&mut self) {
        info!("Raid Helper actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RaidHelperCommand::FetchSchedule(response_tx) => {
                    let result = self.fetch_schedule().await;
                    let _ = response_tx.send(result).await;
                }
                RaidHelperCommand::Shutdown => {
                    info!("Raid Helper actor shutting down");
                    break;
                }
            }
        }

        info!("Raid Helper actor shut down");
    }

    /// Run one aggregation: validate, fetch all servers, merge, group
    async fn fetch_schedule(&self) -> AppResult<Schedule> {
        let config = {
            let config_read = self.config.read().await;
            config_read.clone()
        };

        // Fatal configuration problems surface before any network call
        config.ensure_ready()?;
        let tz = parse_timezone(&config.timezone)?;

        let client = RaidHelperClient::new(
            &config.api_base_url,
            Duration::from_secs(config.api_timeout_secs),
        )?;

        // Memoization only lives for the duration of one fetch action
        self.cache.clear().await;

        info!("Fetching events from {} servers", config.server_ids.len());

        // Per-server fetches are independent; gather them concurrently so
        // total latency is bounded by the slowest server. One failure never
        // aborts the others.
        let fetches = config.server_ids.iter().map(|server_id| {
            let client = &client;
            let cache = &self.cache;
            let access_token = config.access_token.as_str();
            async move {
                let outcome = cache
                    .get_or_fetch(server_id, access_token, || {
                        client.fetch_server_events(server_id, access_token)
                    })
                    .await;
                (server_id.clone(), outcome)
            }
        });

        let outcomes: Vec<FetchOutcome> = futures::future::join_all(fetches).await;

        let aggregation = aggregate(outcomes);
        info!(
            "Aggregated {} events ({} failed servers, {} skipped records)",
            aggregation.events.len(),
            aggregation.errors.len(),
            aggregation.skipped
        );

        Ok(build_schedule(aggregation, tz))
    }
}
