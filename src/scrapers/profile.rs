use crate::clock::Clock;
use crate::config::{SelectorConfig, TimingConfig};
use crate::dom::Document;
use crate::results::{ProfileSnapshot, ScrapeFailure};
use crate::scrapers::extract::{extract_field, extract_repeated_text};
use crate::scrapers::stabilize::stabilize_by_scrolling;
use crate::scrapers::waiter::{ElementWait, WaitOutcome, wait_for_element};
use std::fmt;

/// Phases of a single scrape attempt. `Failed` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePhase {
    Start,
    WaitingPrimary,
    Stabilizing,
    Extracting,
    Failed,
    Done,
}

impl fmt::Display for ScrapePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScrapePhase::Start => "start",
            ScrapePhase::WaitingPrimary => "waiting-primary",
            ScrapePhase::Stabilizing => "stabilizing",
            ScrapePhase::Extracting => "extracting",
            ScrapePhase::Failed => "failed",
            ScrapePhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Extracts a [`ProfileSnapshot`] from a loaded profile page
///
/// The document and clock are borrowed so one live session can be scraped
/// repeatedly; each call to [`scrape_profile`](Self::scrape_profile) is an
/// independent, linear attempt.
pub struct ProfileScraper<'a, D: ?Sized, C: ?Sized> {
    document: &'a D,
    clock: &'a C,
    selectors: &'a SelectorConfig,
    timing: &'a TimingConfig,
}

impl<'a, D, C> ProfileScraper<'a, D, C>
where
    D: Document + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        document: &'a D,
        clock: &'a C,
        selectors: &'a SelectorConfig,
        timing: &'a TimingConfig,
    ) -> Self {
        Self {
            document,
            clock,
            selectors,
            timing,
        }
    }

    fn enter(&self, phase: ScrapePhase) {
        ::log::info!("Scrape phase: {}", phase);
    }

    /// Runs one scrape: wait for the primary field, scroll until stable, extract
    ///
    /// Only a timeout on the primary field fails the scrape. Every other field
    /// degrades to `None` or an empty string.
    pub async fn scrape_profile(&self) -> Result<ProfileSnapshot, ScrapeFailure> {
        self.enter(ScrapePhase::Start);

        self.enter(ScrapePhase::WaitingPrimary);
        let wait = ElementWait::new(&self.selectors.primary, self.timing.wait_timeout());
        let outcome = wait_for_element(
            self.document,
            self.clock,
            &wait,
            self.timing.poll_interval(),
        )
        .await;
        if let WaitOutcome::NotFound = outcome {
            self.enter(ScrapePhase::Failed);
            let failure =
                ScrapeFailure::element_not_found(&wait.selector, wait.timeout.as_millis());
            ::log::error!("Scraping failed: {}", failure);
            return Err(failure);
        }

        self.enter(ScrapePhase::Stabilizing);
        let stabilization = stabilize_by_scrolling(
            self.document,
            self.clock,
            self.timing.settle_delay(),
            self.timing.max_scroll_rounds,
        )
        .await;
        ::log::info!(
            "Stabilization finished after {} round(s), converged: {}, height: {}",
            stabilization.rounds,
            stabilization.converged,
            stabilization.final_height
        );

        // The primary element may have been re-rendered while scrolling, so look it up again
        self.enter(ScrapePhase::Extracting);
        let headline = extract_field(self.document, &self.selectors.primary, None).await;
        let bio = extract_field(self.document, &self.selectors.secondary, None).await;
        let posts_text = extract_repeated_text(
            self.document,
            &self.selectors.post_container,
            &self.selectors.post_item,
            &self.selectors.post_delimiter,
        )
        .await;

        let snapshot = ProfileSnapshot::new(headline, bio, posts_text);
        ::log::debug!("Scraped profile data: {:?}", snapshot);
        self.enter(ScrapePhase::Done);
        Ok(snapshot)
    }
}
