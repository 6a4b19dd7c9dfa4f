//! Minimum spacing between API calls

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Enforces a minimum delay between successive calls
///
/// The first call goes through immediately; each later call waits until
/// `delay` has passed since the previous one started.
#[derive(Debug)]
pub(crate) struct Throttle {
    delay: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub(crate) const fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    /// Wait for the next slot and claim it
    pub(crate) async fn wait(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.delay).await;
        }
        self.last = Some(Instant::now());
    }
}
