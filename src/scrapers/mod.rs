pub mod extract;
pub mod profile;
pub mod stabilize;
pub mod waiter;

#[cfg(test)]
mod tests;

pub use extract::{extract_field, extract_repeated_text};
pub use profile::{ProfileScraper, ScrapePhase};
pub use stabilize::{Stabilization, stabilize_by_scrolling};
pub use waiter::{ElementWait, WaitOutcome, wait_for_element};
