use crate::clock::Clock;
use crate::dom::Document;
use std::time::Duration;

/// Result of a scroll-until-stable pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stabilization {
    /// Scroll/measure rounds performed
    pub rounds: usize,
    /// True when two consecutive height measurements matched
    pub converged: bool,
    /// Last height measured
    pub final_height: u64,
}

/// Scrolls to the bottom until the document height stops growing
///
/// Each round scrolls to the last measured height, waits `settle_delay`, and
/// measures again; the new measurement is the baseline for the next round.
/// Stops when two consecutive measurements are equal or after `max_rounds`.
/// A DOM error ends the pass early; it is logged, never propagated.
pub async fn stabilize_by_scrolling<D, C>(
    document: &D,
    clock: &C,
    settle_delay: Duration,
    max_rounds: usize,
) -> Stabilization
where
    D: Document + ?Sized,
    C: Clock + ?Sized,
{
    let mut last_height = match document.scroll_height().await {
        Ok(height) => height,
        Err(e) => {
            ::log::warn!("Could not measure document height, skipping scroll: {}", e);
            return Stabilization {
                rounds: 0,
                converged: false,
                final_height: 0,
            };
        }
    };

    let mut rounds = 0;
    while rounds < max_rounds {
        rounds += 1;

        if let Err(e) = document.scroll_to(last_height).await {
            ::log::warn!("Scroll round {} failed: {}", rounds, e);
            return Stabilization {
                rounds,
                converged: false,
                final_height: last_height,
            };
        }
        clock.sleep(settle_delay).await;

        let current_height = match document.scroll_height().await {
            Ok(height) => height,
            Err(e) => {
                ::log::warn!("Height measurement in round {} failed: {}", rounds, e);
                return Stabilization {
                    rounds,
                    converged: false,
                    final_height: last_height,
                };
            }
        };
        ::log::debug!(
            "Scroll round {}: height {} -> {}",
            rounds,
            last_height,
            current_height
        );

        if current_height == last_height {
            return Stabilization {
                rounds,
                converged: true,
                final_height: current_height,
            };
        }
        last_height = current_height;
    }

    ::log::warn!(
        "Document still growing after {} scroll rounds (height {}), continuing without convergence",
        max_rounds,
        last_height
    );
    Stabilization {
        rounds,
        converged: false,
        final_height: last_height,
    }
}
