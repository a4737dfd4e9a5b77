use super::models::{Aggregation, RaidEvent, ServerEvents, ServerId};
use crate::error::AppResult;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of one server's fetch, in configured iteration order
pub type FetchOutcome = (ServerId, AppResult<ServerEvents>);

/// Merge per-server fetch outcomes into a deduplicated flat event list.
///
/// Successful outcomes are normalized event by event; records missing an id
/// or a usable timestamp are skipped and counted, never fatal to the batch.
/// Event ids are globally unique in Raid Helper, so dedup is keyed on the
/// id alone: the first-seen copy wins. Failed outcomes contribute no events
/// and are recorded in the error map so other servers' data still flows
/// through (partial success).
pub fn aggregate(outcomes: Vec<FetchOutcome>) -> Aggregation {
    let mut aggregation = Aggregation::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (server_id, outcome) in outcomes {
        let server_events = match outcome {
            Ok(server_events) => server_events,
            Err(e) => {
                debug!("Fetch failed for server {}: {}", server_id, e);
                aggregation.errors.insert(server_id, e.to_string());
                continue;
            }
        };

        for raw in &server_events.events {
            let event = match RaidEvent::from_raw(
                raw,
                &server_events.server_id,
                server_events.server_name.as_deref(),
            ) {
                Ok(event) => event,
                Err(e) => {
                    debug!("Skipping malformed record from server {}: {}", server_id, e);
                    aggregation.skipped += 1;
                    continue;
                }
            };

            if seen.insert(event.id.clone()) {
                aggregation.events.push(event);
            } else {
                debug!("Dropping duplicate event {} from server {}", event.id, server_id);
            }
        }
    }

    aggregation
}
