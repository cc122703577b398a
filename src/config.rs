use serde::Deserialize;

use crate::services::curation::CurationConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; the in-memory catalog is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Usernames whose play history anchors the curated library (comma-separated)
    #[serde(default = "default_real_players")]
    pub real_players: Vec<String>,

    /// Steady-state size the curated library aims for
    #[serde(default = "default_library_target_size")]
    pub library_target_size: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_real_players() -> Vec<String> {
    CurationConfig::default().real_players
}

fn default_library_target_size() -> usize {
    CurationConfig::default().target_total
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Curation settings derived from this configuration
    pub fn curation(&self) -> CurationConfig {
        CurationConfig {
            real_players: self.real_players.clone(),
            target_total: self.library_target_size,
            ..CurationConfig::default()
        }
    }
}
