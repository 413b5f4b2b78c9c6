use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// CSS selectors used to locate the profile fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Primary field; its presence gates the whole scrape
    #[serde(default = "default_primary_selector")]
    pub primary: String,

    /// Secondary field, extracted best-effort
    #[serde(default = "default_secondary_selector")]
    pub secondary: String,

    /// Container of one repeated item (e.g. a feed post)
    #[serde(default = "default_post_container_selector")]
    pub post_container: String,

    /// Text node looked up inside each container
    #[serde(default = "default_post_item_selector")]
    pub post_item: String,

    /// Appended after each extracted post body
    #[serde(default = "default_post_delimiter")]
    pub post_delimiter: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_selector(),
            secondary: default_secondary_selector(),
            post_container: default_post_container_selector(),
            post_item: default_post_item_selector(),
            post_delimiter: default_post_delimiter(),
        }
    }
}

/// Durations and bounds for the waiting and scrolling phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long to wait for the primary field before giving up
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Interval between element lookups while waiting
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay after each scroll before the document height is measured again
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Upper bound on scroll rounds for pages that never stop growing
    #[serde(default = "default_max_scroll_rounds")]
    pub max_scroll_rounds: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            max_scroll_rounds: default_max_scroll_rounds(),
        }
    }
}

impl TimingConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Which URLs are treated as profile pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUrlConfig {
    /// Hosts a profile page may be served from
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Regex the URL path must match
    #[serde(default = "default_profile_path_pattern")]
    pub path_pattern: String,
}

impl Default for ProfileUrlConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: default_allowed_hosts(),
            path_pattern: default_profile_path_pattern(),
        }
    }
}

/// Top-level configuration for a profile scrape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub profile_urls: ProfileUrlConfig,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Base URL of the analysis service; analysis is skipped when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_url: Option<String>,
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }
}

fn default_primary_selector() -> String {
    ".text-body-medium.break-words".to_string()
}

fn default_secondary_selector() -> String {
    ".artdeco-card.pv-profile-card .inline-show-more-text".to_string()
}

fn default_post_container_selector() -> String {
    ".scaffold-finite-scroll__content .feed-shared-update-v2".to_string()
}

fn default_post_item_selector() -> String {
    ".update-components-text".to_string()
}

fn default_post_delimiter() -> String {
    "\n---\n".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_max_scroll_rounds() -> usize {
    25
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["linkedin.com".to_string(), "www.linkedin.com".to_string()]
}

fn default_profile_path_pattern() -> String {
    r"^/in/[^/]+/?".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}
