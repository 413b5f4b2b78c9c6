use clap::Parser;
use profile_scrape::analysis::{AnalysisClient, AnalysisResponse};
use profile_scrape::config::ScraperConfig;
use profile_scrape::messenger::JsonLineSink;
use profile_scrape::{PageSource, ProfileScrape, ScrapeMessage};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };
    config.apply_env();
    if let Some(url) = &args.analyze {
        config.analysis_url = Some(url.clone());
    }

    let source = match &args.html {
        Some(path) => {
            ::log::info!("Scraping saved snapshot {} for {}", path, args.url);
            PageSource::Html {
                url: args.url.clone(),
                path: path.clone(),
            }
        }
        None => {
            ::log::info!("Scraping {} via WebDriver at {}", args.url, config.webdriver_url);
            PageSource::Web(args.url.clone())
        }
    };

    let mut scrape = ProfileScrape::new(source).with_config(config);
    if let Some(url) = args.webdriver_url {
        scrape = scrape.with_webdriver_url(url);
    }
    if let Some(millis) = args.wait_timeout {
        scrape = scrape.with_wait_timeout(millis);
    }
    if let Some(millis) = args.settle_delay {
        scrape = scrape.with_settle_delay(millis);
    }
    if let Some(rounds) = args.max_scroll_rounds {
        scrape = scrape.with_max_scroll_rounds(rounds);
    }

    let start_time = std::time::Instant::now();
    let sink = JsonLineSink::new(std::io::stdout());
    let message = scrape.run(&sink).await?;
    ::log::info!(
        "Scrape finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    let snapshot = match message {
        ScrapeMessage::ScrapedData { data } => data,
        ScrapeMessage::ScrapeFailed { error } => return Err(error.into()),
    };

    let Some(analysis_url) = scrape.config().analysis_url.as_deref() else {
        return Ok(());
    };
    let client = AnalysisClient::new(analysis_url, args.token.as_deref())?;
    match client.analyze(&snapshot).await? {
        AnalysisResponse::Coaching(report) => {
            println!("Immediate steps:");
            for step in &report.immediate_steps {
                println!("  - {}", step);
            }
            println!("Suggestions:");
            for suggestion in &report.suggestions {
                println!("  - {}", suggestion);
            }
        }
        AnalysisResponse::Questionnaire(request) => {
            println!("More information is needed before coaching:");
            for question in &request.questions {
                println!("  - {}", question);
            }
        }
    }
    Ok(())
}
