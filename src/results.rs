use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured view of a profile page's visible content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Primary field text, if it could be re-resolved after scrolling
    pub headline: Option<String>,

    /// Secondary field text (absent on some layouts or privacy settings)
    pub bio: Option<String>,

    /// Post bodies, each followed by the configured delimiter
    pub posts_text: String,
}

impl ProfileSnapshot {
    /// Create a new snapshot instance
    pub fn new(headline: Option<String>, bio: Option<String>, posts_text: String) -> Self {
        Self {
            headline,
            bio,
            posts_text,
        }
    }
}

/// Terminal failure of a scrape attempt
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ScrapeFailure {
    pub message: String,
}

impl ScrapeFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The required element never appeared within its timeout
    pub fn element_not_found(selector: &str, timeout_ms: u128) -> Self {
        Self::new(format!(
            "Element with selector \"{}\" not found within {}ms.",
            selector, timeout_ms
        ))
    }
}
