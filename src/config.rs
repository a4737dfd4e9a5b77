use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use toml;

/// Fixed Raid Helper events endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://raid-helper.dev/api/events/";

/// Default display timezone when none is configured
pub const DEFAULT_TIMEZONE: &str = "Europe/Prague";

/// Default per-request timeout in seconds
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Raid Helper access token authorizing event reads
    pub access_token: String,
    /// Discord server IDs whose events are aggregated
    pub server_ids: Vec<String>,
    /// Timezone used for grouping and display
    pub timezone: String,
    /// Raid Helper events endpoint
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub api_timeout_secs: u64,
}

/// Shape of the optional `config/servers.toml` file
#[derive(Debug, Serialize, Deserialize)]
struct ServersFile {
    servers: Vec<String>,
}

impl Config {
    /// Load configuration from environment and the servers file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let access_token = env::var("RAID_HELPER_ACCESS_TOKEN")
            .map_err(|_| env_error("RAID_HELPER_ACCESS_TOKEN"))?;

        // Server IDs come from the environment when set, otherwise from
        // config/servers.toml
        let server_ids = match env::var("RAID_HELPER_SERVER_IDS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => Self::load_servers_file().unwrap_or_default(),
        };

        // Default timezone
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from(DEFAULT_TIMEZONE));

        let api_base_url =
            env::var("RAID_HELPER_API_URL").unwrap_or_else(|_| String::from(DEFAULT_API_BASE_URL));

        let api_timeout_secs = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| env_error("Invalid API_TIMEOUT_SECS format"))?,
            Err(_) => DEFAULT_API_TIMEOUT_SECS,
        };

        Ok(Config {
            access_token,
            server_ids,
            timezone,
            api_base_url,
            api_timeout_secs,
        })
    }

    /// Validate that an aggregation can run, before any network call
    pub fn ensure_ready(&self) -> AppResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(crate::error::config_error("Access token is empty"));
        }
        if self.server_ids.is_empty() {
            return Err(crate::error::config_error("No server IDs configured"));
        }
        if self.server_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(crate::error::config_error("Empty server ID in list"));
        }
        Ok(())
    }

    /// Read the server-id list from config/servers.toml if present
    fn load_servers_file() -> Option<Vec<String>> {
        let content = fs::read_to_string("config/servers.toml").ok()?;
        let file: ServersFile = toml::from_str(&content).ok()?;
        Some(file.servers)
    }

    /// Replace the server-id list and persist it to the servers file
    #[allow(dead_code)]
    pub fn set_server_ids(&mut self, server_ids: Vec<String>) -> AppResult<()> {
        self.server_ids = server_ids;
        self.save_servers()
    }

    /// Save the server-id list to config/servers.toml
    #[allow(dead_code)]
    fn save_servers(&self) -> AppResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let file = ServersFile {
            servers: self.server_ids.clone(),
        };
        let toml_str = toml::to_string(&file)?;
        fs::write("config/servers.toml", toml_str)?;

        Ok(())
    }
}
