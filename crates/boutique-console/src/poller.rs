use crossbeam_channel::{unbounded, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::model::Order;

/// Default polling cadence for the order listing.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// One poll outcome. Failures carry the formatted error only; the caller
/// keeps its last-known-good state and never derives a notification from
/// a failed fetch.
#[derive(Debug)]
pub enum PollEvent {
    Fetched(Vec<Order>),
    Failed(String),
}

/// Background worker calling the unfiltered order listing on a fixed
/// interval and handing outcomes to the UI thread over a channel.
///
/// Dropping (or stopping) the handle clears the timer so no further ticks
/// fire; an already in-flight request is not cancelled, its result is
/// simply discarded with the channel.
pub struct Poller {
    events: Receiver<PollEvent>,
    stop: Arc<AtomicBool>,
}

impl Poller {
    pub fn spawn(client: ApiClient, interval: Duration) -> Self {
        let (tx, rx) = unbounded::<PollEvent>();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        std::thread::Builder::new()
            .name("order-poller".into())
            .spawn(move || {
                const STEP: Duration = Duration::from_millis(100);

                loop {
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }

                    let event = match client.poll_orders() {
                        Ok(orders) => PollEvent::Fetched(orders),
                        Err(e) => PollEvent::Failed(e.to_string()),
                    };
                    if tx.send(event).is_err() {
                        break;
                    }

                    // Sleep in short steps so a stop request is honored
                    // promptly instead of after a full interval.
                    let mut slept = Duration::ZERO;
                    while slept < interval {
                        if stop_flag.load(Ordering::Relaxed) {
                            return;
                        }
                        std::thread::sleep(STEP);
                        slept += STEP;
                    }
                }
            })
            .expect("Failed to spawn order-poller thread");

        Self { events: rx, stop }
    }

    /// Next pending event, if any. Never blocks the UI loop.
    pub fn try_recv(&self) -> Option<PollEvent> {
        self.events.try_recv().ok()
    }

    /// Blocks until the next event or the timeout elapses. Test helper and
    /// first-paint convenience.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PollEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
