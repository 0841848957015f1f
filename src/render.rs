//! Driving the pagination engine with bounded waits.

use crate::config::StudioConfig;
use log::{debug, warn};
use quire_traits::{PaginationEngine, PaginationError};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimings {
    pub render_timeout: Duration,
    pub font_ready_timeout: Duration,
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl From<&StudioConfig> for RenderTimings {
    fn from(config: &StudioConfig) -> Self {
        Self {
            render_timeout: config.render_timeout(),
            font_ready_timeout: config.font_ready_timeout(),
            poll_interval: config.poll_interval(),
            settle_delay: config.settle_delay(),
        }
    }
}

/// Polls `condition` every `interval` until it holds or `limit` elapses.
/// Returns whether it held.
async fn wait_for(condition: impl Fn() -> bool, limit: Duration, interval: Duration) -> bool {
    timeout(limit, async {
        while !condition() {
            sleep(interval).await;
        }
    })
    .await
    .is_ok()
}

/// Loads `document` into the engine and waits until it has produced pages.
///
/// When `wait_for_fonts` is set, the engine gets up to the font timeout to
/// report its fonts ready first; running out of that wait is logged and the
/// render continues. Running out of the page wait is a failure.
pub async fn paginate(
    engine: &mut dyn PaginationEngine,
    document: &str,
    wait_for_fonts: bool,
    timings: RenderTimings,
) -> Result<usize, PaginationError> {
    if wait_for_fonts
        && !wait_for(|| engine.fonts_ready(), timings.font_ready_timeout, timings.poll_interval).await
    {
        warn!(
            "Fonts not ready after {} ms; rendering anyway",
            timings.font_ready_timeout.as_millis()
        );
    }

    let started = Instant::now();
    engine.load(document)?;
    debug!("Loaded {} bytes into {}", document.len(), engine.name());

    if !wait_for(|| engine.page_count() > 0, timings.render_timeout, timings.poll_interval).await {
        return Err(PaginationError::Timeout {
            waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
    }

    sleep(timings.settle_delay).await;
    Ok(engine.page_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Produces pages after a number of polls.
    struct SlowEngine {
        polls_until_pages: Cell<usize>,
        loaded: bool,
    }

    impl PaginationEngine for SlowEngine {
        fn load(&mut self, _document: &str) -> Result<(), PaginationError> {
            self.loaded = true;
            Ok(())
        }

        fn page_count(&self) -> usize {
            let left = self.polls_until_pages.get();
            if !self.loaded || left > 0 {
                self.polls_until_pages.set(left.saturating_sub(1));
                0
            } else {
                4
            }
        }

        fn fonts_ready(&self) -> bool {
            false
        }

        fn name(&self) -> &'static str {
            "SlowEngine"
        }
    }

    fn timings() -> RenderTimings {
        RenderTimings::from(&StudioConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_pages() {
        let mut engine = SlowEngine {
            polls_until_pages: Cell::new(3),
            loaded: false,
        };
        let pages = paginate(&mut engine, "<html></html>", true, timings()).await.unwrap();
        assert_eq!(pages, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_pages() {
        let mut engine = SlowEngine {
            polls_until_pages: Cell::new(usize::MAX),
            loaded: false,
        };
        let err = paginate(&mut engine, "<html></html>", false, timings()).await.unwrap_err();
        assert!(matches!(err, PaginationError::Timeout { waited_ms } if waited_ms >= 10_000));
    }
}
