use super::support::{MockDocument, VirtualClock};
use crate::config::{SelectorConfig, TimingConfig};
use crate::results::ProfileSnapshot;
use crate::scrapers::profile::ProfileScraper;
use std::time::Duration;

fn selectors() -> SelectorConfig {
    SelectorConfig {
        primary: ".headline".to_string(),
        secondary: ".bio".to_string(),
        post_container: ".post".to_string(),
        post_item: ".post-body".to_string(),
        post_delimiter: "\n---\n".to_string(),
    }
}

fn timing(wait_timeout_ms: u64) -> TimingConfig {
    TimingConfig {
        wait_timeout_ms,
        poll_interval_ms: 100,
        settle_delay_ms: 2000,
        max_scroll_rounds: 25,
    }
}

#[tokio::test]
async fn test_scrape_with_missing_bio() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element_at(".headline", " Product Designer ", Duration::from_millis(50));
    let first = doc.element(".post", "");
    let second = doc.element(".post", "");
    doc.child(first, ".post-body", "Shipped a redesign");
    doc.child(second, ".post-body", "Hiring!");
    doc.heights(&[1200, 1800, 1800]);

    let selectors = selectors();
    let timing = timing(5000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    let snapshot = scraper.scrape_profile().await.unwrap();

    assert_eq!(
        snapshot,
        ProfileSnapshot {
            headline: Some("Product Designer".to_string()),
            bio: None,
            posts_text: "Shipped a redesign\n---\nHiring!\n---\n".to_string(),
        }
    );
    assert_eq!(doc.scroll_count(), 2);
}

#[tokio::test]
async fn test_primary_timeout_fails_without_further_extraction() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element(".bio", "About me");
    let post = doc.element(".post", "");
    doc.child(post, ".post-body", "A post");

    let selectors = selectors();
    let timing = timing(3000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    let failure = scraper.scrape_profile().await.unwrap_err();

    assert!(failure.message.contains(".headline"));
    assert!(failure.message.contains("3000ms"));
    assert_eq!(
        failure.message,
        "Element with selector \".headline\" not found within 3000ms."
    );
    assert_eq!(doc.find_calls(".bio"), 0);
    assert_eq!(doc.find_all_calls(".post"), 0);
    assert_eq!(doc.find_calls(".post-body"), 0);
    assert_eq!(doc.scroll_count(), 0);
    assert_eq!(doc.height_reads(), 0);
}

#[tokio::test]
async fn test_extraction_happens_after_stabilization() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element(".headline", "Engineer");
    // Lazily loaded: only visible once scrolling has run for a while
    let late = doc.element_at(".post", "", Duration::from_millis(3000));
    doc.child(late, ".post-body", "Loaded late");
    doc.heights(&[500, 900, 900]);

    let selectors = selectors();
    let timing = timing(5000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    let snapshot = scraper.scrape_profile().await.unwrap();

    assert_eq!(snapshot.posts_text, "Loaded late\n---\n");
    assert_eq!(clock.elapsed_ms(), 4000);
}

#[tokio::test]
async fn test_optional_field_errors_do_not_fail_scrape() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element(".headline", "Engineer");
    doc.element(".bio", "About me");
    doc.fail_selector(".bio");
    doc.fail_selector(".post");
    doc.fail_height();

    let selectors = selectors();
    let timing = timing(5000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    let snapshot = scraper.scrape_profile().await.unwrap();

    assert_eq!(snapshot.headline.as_deref(), Some("Engineer"));
    assert_eq!(snapshot.bio, None);
    assert_eq!(snapshot.posts_text, "");
}

#[tokio::test]
async fn test_primary_is_resolved_again_after_scrolling() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element(".headline", "Engineer");

    let selectors = selectors();
    let timing = timing(5000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    scraper.scrape_profile().await.unwrap();

    // Once while waiting, once for extraction
    assert_eq!(doc.find_calls(".headline"), 2);
}

#[tokio::test]
async fn test_scraper_can_be_reinvoked() {
    let clock = VirtualClock::new();
    let mut doc = MockDocument::new(clock.clone());
    doc.element(".headline", "Engineer");

    let selectors = selectors();
    let timing = timing(5000);
    let scraper = ProfileScraper::new(&doc, clock.as_ref(), &selectors, &timing);
    let first = scraper.scrape_profile().await.unwrap();
    let second = scraper.scrape_profile().await.unwrap();

    assert_eq!(first, second);
}
