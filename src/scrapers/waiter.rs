use crate::clock::Clock;
use crate::dom::Document;
use std::time::Duration;

/// A single bounded lookup: which selector, and for how long to keep trying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementWait {
    pub selector: String,
    pub timeout: Duration,
}

impl ElementWait {
    pub fn new(selector: impl Into<String>, timeout: Duration) -> Self {
        Self {
            selector: selector.into(),
            timeout,
        }
    }
}

/// How a wait settled. `NotFound` is an outcome, not an error.
#[derive(Debug)]
pub enum WaitOutcome<E> {
    Found(E),
    NotFound,
}

impl<E> WaitOutcome<E> {
    pub fn is_found(&self) -> bool {
        matches!(self, WaitOutcome::Found(_))
    }

    pub fn into_option(self) -> Option<E> {
        match self {
            WaitOutcome::Found(element) => Some(element),
            WaitOutcome::NotFound => None,
        }
    }
}

/// Polls for the first element matching `wait.selector` every `poll_interval`
///
/// Looks once immediately, then after each poll. Each lookup races the time
/// left until the deadline and sleeps are clipped to it, so the wait always
/// settles within `timeout + poll_interval` even when a lookup stalls.
/// Lookup errors while polling count as "not present yet".
pub async fn wait_for_element<D, C>(
    document: &D,
    clock: &C,
    wait: &ElementWait,
    poll_interval: Duration,
) -> WaitOutcome<D::Element>
where
    D: Document + ?Sized,
    C: Clock + ?Sized,
{
    let started = clock.elapsed();
    let deadline = started + wait.timeout;
    let mut polls = 0usize;

    loop {
        polls += 1;
        let remaining = deadline.saturating_sub(clock.elapsed());
        let lookup = tokio::select! {
            biased;
            result = document.find(&wait.selector) => Some(result),
            _ = clock.sleep(remaining) => None,
        };
        let Some(result) = lookup else {
            ::log::debug!(
                "Lookup of \"{}\" still pending at the deadline after {} poll(s)",
                wait.selector,
                polls
            );
            return WaitOutcome::NotFound;
        };

        match result {
            Ok(Some(element)) => {
                ::log::debug!(
                    "Found \"{}\" after {} poll(s) ({:?})",
                    wait.selector,
                    polls,
                    clock.elapsed().saturating_sub(started)
                );
                return WaitOutcome::Found(element);
            }
            Ok(None) => {}
            Err(e) => {
                ::log::trace!("Lookup of \"{}\" failed while polling: {}", wait.selector, e);
            }
        }

        let now = clock.elapsed();
        if now >= deadline {
            ::log::debug!(
                "Gave up on \"{}\" after {} poll(s) ({:?})",
                wait.selector,
                polls,
                now.saturating_sub(started)
            );
            return WaitOutcome::NotFound;
        }

        // Zero-length sleeps would spin
        let step = poll_interval.min(deadline - now).max(Duration::from_millis(1));
        clock.sleep(step).await;
    }
}
