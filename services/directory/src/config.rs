use serde::Deserialize;

use steeple_core::config::Config;

/// Directory service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct DirectoryConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `DIRECTORY_PORT`.
    #[serde(default = "default_port")]
    pub directory_port: u16,
    /// Base URL of the identity provider's admin API. Env var: `IDENTITY_API_URL`.
    pub identity_api_url: String,
    /// Service bearer token for the admin API. Env var: `IDENTITY_API_TOKEN`.
    pub identity_api_token: String,
    /// Outbox worker poll interval in seconds (default 5).
    /// Env var: `OUTBOX_POLL_SECS`.
    #[serde(default = "default_outbox_poll_secs")]
    pub outbox_poll_secs: u64,
}

fn default_port() -> u16 {
    3121
}

fn default_outbox_poll_secs() -> u64 {
    5
}

impl Config for DirectoryConfig {}
