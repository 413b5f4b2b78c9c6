use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Time source for polling and settle delays
///
/// Scraping code never reads the wall clock directly, so tests can drive
/// timeouts with a virtual clock instead of real sleeps.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time since the clock's origin
    fn elapsed(&self) -> Duration;

    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
