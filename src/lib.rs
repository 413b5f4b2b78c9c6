pub mod analysis;
pub mod clock;
pub mod config;
pub mod dom;
pub mod filter;
pub mod messenger;
pub mod results;
pub mod scrapers;
pub mod utils;

// Re-export commonly used types for convenience
pub use messenger::{MessageSink, ScrapeMessage};
pub use results::{ProfileSnapshot, ScrapeFailure};
pub use scrapers::ProfileScraper;

use clock::TokioClock;
use config::ScraperConfig;
use dom::{LiveDocument, StaticDocument};
use filter::ProfileUrlFilter;
use std::error::Error;

/// Where the profile page comes from
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Live page loaded through WebDriver
    Web(String),
    /// Saved HTML snapshot on disk, captured from `url`
    Html { url: String, path: String },
}

impl PageSource {
    /// The profile URL this page claims to be
    pub fn url(&self) -> &str {
        match self {
            PageSource::Web(url) => url,
            PageSource::Html { url, .. } => url,
        }
    }
}

/// Builder for a single profile scrape
pub struct ProfileScrape {
    source: PageSource,
    config: ScraperConfig,
}

impl ProfileScrape {
    /// Create a new builder with default configuration
    pub fn new(source: PageSource) -> Self {
        Self {
            source,
            config: ScraperConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set how long to wait for the primary field
    pub fn with_wait_timeout(mut self, millis: u64) -> Self {
        self.config.timing.wait_timeout_ms = millis;
        self
    }

    /// Set the delay after each scroll
    pub fn with_settle_delay(mut self, millis: u64) -> Self {
        self.config.timing.settle_delay_ms = millis;
        self
    }

    /// Cap the number of scroll rounds
    pub fn with_max_scroll_rounds(mut self, rounds: usize) -> Self {
        self.config.timing.max_scroll_rounds = rounds;
        self
    }

    /// Override the WebDriver URL
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape the page and report the outcome to `sink`
    ///
    /// `Err` is reserved for setup problems (bad URL, unreachable driver,
    /// unreadable snapshot). A page that never renders the primary field is a
    /// normal outcome reported as [`ScrapeMessage::ScrapeFailed`].
    pub async fn run<S: MessageSink + ?Sized>(
        &self,
        sink: &S,
    ) -> Result<ScrapeMessage, Box<dyn Error>> {
        let clock = TokioClock::new();
        let selectors = &self.config.selectors;
        let timing = &self.config.timing;

        let url_filter = ProfileUrlFilter::new(&self.config.profile_urls)?;
        if !url_filter.is_profile_str(self.source.url()) {
            return Err(format!("Not a profile page: {}", self.source.url()).into());
        }

        match &self.source {
            PageSource::Web(url) => {
                let document = LiveDocument::open(&self.config.webdriver_url, url).await?;
                let scraper = ProfileScraper::new(&document, &clock, selectors, timing);
                let result = messenger::report_scrape(&scraper, sink).await;

                if let Err(e) = document.close().await {
                    ::log::warn!("Failed to close WebDriver session: {}", e);
                }
                Ok(result?)
            }
            PageSource::Html { path, .. } => {
                let document = StaticDocument::from_file(path)?;
                let scraper = ProfileScraper::new(&document, &clock, selectors, timing);
                Ok(messenger::report_scrape(&scraper, sink).await?)
            }
        }
    }
}
