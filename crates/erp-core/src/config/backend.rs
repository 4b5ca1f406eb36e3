//! Hosted backend configuration.

use serde::{Deserialize, Serialize};

/// Which implementation of the query contract to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// The hosted service's REST data API.
    Rest,
    /// A direct PostgreSQL connection to the hosted database.
    Postgres,
    /// In-process tables (demo mode and tests).
    #[default]
    Memory,
}

/// Connection settings for the hosted relational backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend implementation to use.
    #[serde(default)]
    pub mode: BackendMode,
    /// Base URL of the hosted project (e.g. `https://xyz.example.co`).
    #[serde(default)]
    pub url: String,
    /// Public (anon) API key sent as the `apikey` header.
    #[serde(default)]
    pub anon_key: String,
    /// Database schema exposed by the data API.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Per-request timeout in seconds for REST calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// PostgreSQL connection URL (only for `postgres` mode).
    #[serde(default)]
    pub database_url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            url: String::new(),
            anon_key: String::new(),
            schema: default_schema(),
            request_timeout_seconds: default_request_timeout(),
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
