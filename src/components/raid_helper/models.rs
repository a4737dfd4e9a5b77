use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{parse_error, AppResult};

/// Opaque identifier of a Discord server in the Raid Helper system
pub type ServerId = String;

/// Untyped event record as returned by the API
pub type RawEvent = serde_json::Value;

/// Events reported by one server, as parsed from a single API response
#[derive(Debug, Clone)]
pub struct ServerEvents {
    pub server_id: ServerId,
    pub server_name: Option<String>,
    pub events: Vec<RawEvent>,
}

/// Normalized raid event with server-identifying metadata attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub server_id: ServerId,
    pub server_name: Option<String>,
    pub leader: Option<String>,
    pub description: Option<String>,
    pub signup_count: Option<u32>,
    pub channel_name: Option<String>,
    /// The record this event was normalized from
    pub raw: RawEvent,
}

impl RaidEvent {
    /// Normalize one raw record. Records without an id or a usable start
    /// timestamp are rejected so the aggregator can skip and count them.
    pub fn from_raw(
        raw: &RawEvent,
        server_id: &str,
        server_name: Option<&str>,
    ) -> AppResult<Self> {
        let id = string_field(raw, "id")
            .ok_or_else(|| parse_error("Event record is missing an id"))?;

        let unix_time = int_field(raw, "unixtime")
            .ok_or_else(|| parse_error(&format!("Event {} has no unixtime", id)))?;
        let start_time = Utc
            .timestamp_opt(unix_time, 0)
            .single()
            .ok_or_else(|| parse_error(&format!("Event {} has an invalid unixtime", id)))?;

        let title = string_field(raw, "displayTitle")
            .or_else(|| string_field(raw, "title"))
            .unwrap_or_else(|| String::from("Untitled event"));

        Ok(RaidEvent {
            id,
            title,
            start_time,
            server_id: string_field(raw, "serverId").unwrap_or_else(|| server_id.to_string()),
            server_name: server_name.map(|s| s.to_string()),
            leader: string_field(raw, "leader"),
            description: string_field(raw, "description").filter(|s| !s.trim().is_empty()),
            signup_count: int_field(raw, "signupcount").and_then(|n| u32::try_from(n).ok()),
            channel_name: string_field(raw, "channelName"),
            raw: raw.clone(),
        })
    }
}

/// Read a field as a string, accepting JSON strings and numbers
fn string_field(raw: &RawEvent, key: &str) -> Option<String> {
    match raw.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a field as an integer, accepting JSON numbers and numeric strings
fn int_field(raw: &RawEvent, key: &str) -> Option<i64> {
    match raw.get(key)? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Flat, deduplicated event collection before day grouping
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Deduplicated events, in no particular order
    pub events: Vec<RaidEvent>,
    /// Servers whose fetch failed, with a human-readable cause
    pub errors: BTreeMap<ServerId, String>,
    /// Count of malformed records that were dropped
    pub skipped: usize,
}

/// All events of one local calendar day, sorted by start time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub events: Vec<RaidEvent>,
}

/// Day-grouped schedule plus per-server fetch failures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    /// Day groups sorted ascending by date
    pub groups: Vec<DayGroup>,
    /// Servers whose fetch failed, with a human-readable cause
    pub errors: BTreeMap<ServerId, String>,
    /// Count of malformed records that were dropped
    pub skipped: usize,
}

impl Schedule {
    /// Total number of events across all day groups
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(|g| g.events.len()).sum()
    }
}
