use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Steam Web API key
    pub steam_api_key: String,

    /// Steam Web API base URL
    #[serde(default = "default_steam_api_url")]
    pub steam_api_url: String,

    /// Directory holding the catalog artifacts (vectors, lookup tables, NDJSON records)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Number of personalized recommendations to return
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Number of discovery picks to return
    #[serde(default = "default_discovery_count")]
    pub discovery_count: usize,

    /// Power-law exponent for discovery sampling
    #[serde(default = "default_discovery_power")]
    pub discovery_power: f64,
}

fn default_steam_api_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_recommendation_count() -> usize {
    10
}

fn default_discovery_count() -> usize {
    10
}

fn default_discovery_power() -> f64 {
    0.75
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
