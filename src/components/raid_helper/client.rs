use super::models::{RawEvent, ServerEvents};
use crate::error::{fetch_error, AppResult};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// User agent sent with every API request
const USER_AGENT: &str = "RaidHelperCalendar/1.0";

/// Thin client for the Raid Helper events endpoint.
///
/// One call maps to one `POST` against the configured endpoint; there are
/// no retries. Every failure is tagged with the server id it belongs to.
pub struct RaidHelperClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RaidHelperClient {
    /// Create a client for the given endpoint
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let endpoint = Url::parse(base_url).map_err(|e| {
            crate::error::config_error(&format!("Invalid API base URL {}: {}", base_url, e))
        })?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            timeout,
        })
    }

    /// Fetch the raw event list for a single server
    pub async fn fetch_server_events(
        &self,
        server_id: &str,
        access_token: &str,
    ) -> AppResult<ServerEvents> {
        if server_id.trim().is_empty() {
            return Err(fetch_error(server_id, "Server id is empty"));
        }
        if access_token.trim().is_empty() {
            return Err(fetch_error(server_id, "Access token is empty"));
        }

        let payload = json!({
            "serverid": server_id,
            "accessToken": access_token,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| fetch_error(server_id, &format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(fetch_error(
                server_id,
                &format!("HTTP {} - {}", status, error_body),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| fetch_error(server_id, &format!("Failed to parse response: {}", e)))?;

        Self::parse_response(server_id, body)
    }

    /// Extract the event list from a response body.
    ///
    /// The documented contract is a bare JSON array of event records, but
    /// live responses arrive wrapped in an object with `servername` and
    /// `events` keys. Both shapes are accepted.
    fn parse_response(server_id: &str, body: serde_json::Value) -> AppResult<ServerEvents> {
        match body {
            serde_json::Value::Array(events) => Ok(ServerEvents {
                server_id: server_id.to_string(),
                server_name: None,
                events,
            }),
            serde_json::Value::Object(mut fields) => {
                let server_name = fields
                    .get("servername")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
                let events: Vec<RawEvent> = match fields.remove("events") {
                    Some(serde_json::Value::Array(events)) => events,
                    _ => {
                        return Err(fetch_error(
                            server_id,
                            "Malformed response body: no events array",
                        ))
                    }
                };
                Ok(ServerEvents {
                    server_id: server_id.to_string(),
                    server_name,
                    events,
                })
            }
            _ => Err(fetch_error(
                server_id,
                "Malformed response body: expected an array or object",
            )),
        }
    }
}
