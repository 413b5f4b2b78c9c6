use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "profile-scrape")]
#[command(
    about = "Scrapes a profile page into a structured snapshot and optionally requests coaching"
)]
#[command(version)]
pub struct Args {
    /// Profile page URL to scrape
    pub url: String,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scrape a saved HTML snapshot instead of a live page
    #[arg(long)]
    pub html: Option<String>,

    /// WebDriver URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// How long to wait for the primary field, in milliseconds
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Delay after each scroll, in milliseconds
    #[arg(long)]
    pub settle_delay: Option<u64>,

    /// Maximum number of scroll rounds
    #[arg(long)]
    pub max_scroll_rounds: Option<usize>,

    /// Base URL of the analysis service
    #[arg(long)]
    pub analyze: Option<String>,

    /// Access token forwarded to the analysis service
    #[arg(long, env = "PROFILE_SCRAPE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
