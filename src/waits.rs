//! Named suspension points.
//!
//! The loader is single-threaded and cooperative. Wherever the browser would
//! have to yield (an image decoding, the document finishing, reflow settling)
//! a controller stops and reports a [`Wait`]. The host performs it and
//! resumes the controller. Keeping the waits as values means tests can drive
//! every lifecycle deterministically and the durations live in one place.
//!
//! | Wait | Host action | Why |
//! |------|-------------|-----|
//! | [`Wait::ImageDecode`] | `img.decode()`, errors ignored | the placeholder must be in the layout before the box is measured |
//! | [`Wait::DocumentLoad`] | `window` `load` event | stylesheets affect every box width |
//! | [`Wait::ImageLoad`] | the element's `load` event (or already complete) | same as decode, for hosts without `decode()` |
//! | [`Wait::Settle`] | timer, [`ImagesConfig::settle_ms`] (40 ms) | reflow after load |

use crate::config::{DiscoveryConfig, ImagesConfig, ResizeConfig};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wait {
    ImageDecode,
    DocumentLoad,
    ImageLoad,
    Settle,
}

impl Wait {
    /// Fixed duration for timer waits; `None` for event waits.
    pub fn duration(self, images: &ImagesConfig) -> Option<Duration> {
        match self {
            Wait::Settle => Some(images.settle()),
            Wait::ImageDecode | Wait::DocumentLoad | Wait::ImageLoad => None,
        }
    }
}

/// Collapses a burst of resize events into one reload.
///
/// Fires once the burst has been quiet for `quiet`, or once `max_wait` has
/// passed since its first event, whichever comes first.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet: Duration,
    max_wait: Duration,
    first: Option<Instant>,
    last: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(config: &ResizeConfig) -> Self {
        Self {
            quiet: Duration::from_millis(config.quiet_ms),
            max_wait: Duration::from_millis(config.max_wait_ms),
            first: None,
            last: None,
        }
    }

    /// Record a resize event.
    pub fn trigger(&mut self, now: Instant) {
        self.first.get_or_insert(now);
        self.last = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.first.is_some()
    }

    /// Whether the pending burst should be handled now. Returns `true` at
    /// most once per burst.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(first), Some(last)) = (self.first, self.last) else {
            return false;
        };
        let quiet = now.saturating_duration_since(last) >= self.quiet;
        let overdue = now.saturating_duration_since(first) >= self.max_wait;
        if quiet || overdue {
            self.first = None;
            self.last = None;
            return true;
        }
        false
    }

    /// Time until [`poll`](Self::poll) would fire, if a burst is pending.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let (first, last) = (self.first?, self.last?);
        let deadline = (last + self.quiet).min(first + self.max_wait);
        Some(deadline.saturating_duration_since(now))
    }
}

/// Sleep before polling round `round` (1-based) of the polling discovery
/// fallback: `round * step`, with `round` capped at `poll_max_rounds`.
pub fn poll_interval(round: u32, config: &DiscoveryConfig) -> Duration {
    let round = round.clamp(1, config.poll_max_rounds);
    Duration::from_millis(config.poll_step_ms * u64::from(round))
}
