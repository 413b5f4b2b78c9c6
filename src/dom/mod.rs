pub mod html;
pub mod webdriver;

pub use html::StaticDocument;
pub use webdriver::LiveDocument;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a document backend
#[derive(Debug, Clone, Error)]
pub enum DomError {
    #[error("Invalid selector \"{0}\"")]
    InvalidSelector(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Script error: {0}")]
    Script(String),
}

impl From<fantoccini::error::CmdError> for DomError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        DomError::Driver(err.to_string())
    }
}

/// Read access to a loaded page plus the one side effect scraping needs (scrolling)
///
/// Element handles are opaque to the scraper; they are only ever passed back
/// into the document that produced them.
#[async_trait]
pub trait Document: Send + Sync {
    type Element: Send + Sync;

    /// First element matching `selector`, or `None`
    async fn find(&self, selector: &str) -> Result<Option<Self::Element>, DomError>;

    /// All elements matching `selector`, in document order
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, DomError>;

    /// First descendant of `scope` matching `selector`, or `None`
    async fn find_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, DomError>;

    /// Rendered text of an element
    async fn inner_text(&self, element: &Self::Element) -> Result<String, DomError>;

    /// Total height of the document body
    async fn scroll_height(&self) -> Result<u64, DomError>;

    /// Scroll the viewport to vertical offset `y`
    async fn scroll_to(&self, y: u64) -> Result<(), DomError>;
}
