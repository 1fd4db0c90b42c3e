use std::path::PathBuf;

use crate::fetch::FetchSettings;
use crate::render::FeedChannel;

pub const DEFAULT_CATALOG_URL: &str = "https://www.audiovault.net/";
pub const DEFAULT_STORE_PATH: &str = "audiovault_entries.json";
pub const DEFAULT_FEED_PATH: &str = "audiovault_feed.rss";

/// Environment variable overriding [`PipelineConfig::feed_path`].
pub const FEED_PATH_ENV: &str = "RSS_FILE_PATH";

/// Everything one pipeline run needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub catalog_url: String,
    pub store_path: PathBuf,
    pub feed_path: PathBuf,
    pub fetch: FetchSettings,
    pub channel: FeedChannel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            feed_path: PathBuf::from(DEFAULT_FEED_PATH),
            fetch: FetchSettings::default(),
            channel: FeedChannel::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults with overrides taken from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; blank values count as unset.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(FEED_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            self.feed_path = PathBuf::from(path);
        }
        self
    }
}
