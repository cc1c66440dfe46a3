use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub log_json: bool,

    // youtube
    pub youtube_api_key: Option<String>,
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
    #[serde(default = "default_comments_max_results")]
    pub comments_max_results: u32,

    /// Entries kept per video; `0` keeps everything.
    #[serde(default = "default_event_log_retention")]
    pub event_log_retention: usize,

    // build
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".into()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_comments_max_results() -> u32 {
    20
}

fn default_event_log_retention() -> usize {
    10_000
}

fn default_local() -> String {
    "local".into()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// A blank key counts as missing.
    pub fn youtube_api_key(&self) -> Option<&str> {
        self.youtube_api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
pub fn test_config<F>(override_config: F) -> Config
where
    F: FnOnce(Config) -> Config,
{
    let config = envy::from_iter::<_, Config>(std::iter::empty::<(String, String)>()).unwrap();
    override_config(config)
}
