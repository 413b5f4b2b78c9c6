use crate::clock::Clock;
use crate::dom::Document;
use crate::results::{ProfileSnapshot, ScrapeFailure};
use crate::scrapers::ProfileScraper;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

/// The single message a scrape attempt reports to its listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ScrapeMessage {
    #[serde(rename = "scrapedData")]
    ScrapedData { data: ProfileSnapshot },

    #[serde(rename = "scrapeFailed")]
    ScrapeFailed { error: String },
}

impl From<Result<ProfileSnapshot, ScrapeFailure>> for ScrapeMessage {
    fn from(result: Result<ProfileSnapshot, ScrapeFailure>) -> Self {
        match result {
            Ok(data) => ScrapeMessage::ScrapedData { data },
            Err(failure) => ScrapeMessage::ScrapeFailed {
                error: failure.message,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum MessengerError {
    #[error("listener is gone")]
    Closed,

    #[error("failed to write message: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Receiver side of the scrape report, living in another execution context
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: ScrapeMessage) -> Result<(), MessengerError>;
}

/// Delivers messages over a tokio channel
pub struct ChannelSink {
    tx: mpsc::Sender<ScrapeMessage>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ScrapeMessage>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiver a listener reads from
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ScrapeMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&self, message: ScrapeMessage) -> Result<(), MessengerError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| MessengerError::Closed)
    }
}

/// Writes each message as one JSON line
pub struct JsonLineSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> MessageSink for JsonLineSink<W> {
    async fn send(&self, message: ScrapeMessage) -> Result<(), MessengerError> {
        let line = serde_json::to_string(&message)?;
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// Runs one scrape and reports its outcome to `sink` exactly once
///
/// Returns the message that was delivered.
pub async fn report_scrape<D, C, S>(
    scraper: &ProfileScraper<'_, D, C>,
    sink: &S,
) -> Result<ScrapeMessage, MessengerError>
where
    D: Document + ?Sized,
    C: Clock + ?Sized,
    S: MessageSink + ?Sized,
{
    let message = ScrapeMessage::from(scraper.scrape_profile().await);
    match &message {
        ScrapeMessage::ScrapedData { .. } => ::log::info!("Sending scraped profile data"),
        ScrapeMessage::ScrapeFailed { error } => ::log::warn!("Sending scrape failure: {}", error),
    }
    sink.send(message.clone()).await?;
    Ok(message)
}
