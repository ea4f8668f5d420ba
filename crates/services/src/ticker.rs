//! Periodic tick scheduling for the session timer.
//!
//! A session owns at most one live `TickHandle`. Schedulers only produce
//! handles and deliver ticks; the session decides what a tick means and
//! drops ticks from handles it no longer owns.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Granularity of the session timer.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one scheduled periodic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Schedule/cancel seam for the session timer.
pub trait TickScheduler: Send {
    /// Start delivering ticks every `period` under a fresh handle.
    fn schedule(&mut self, period: Duration) -> TickHandle;

    /// Stop delivering ticks for `handle`. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

//
// ─── MANUAL ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    active: Vec<TickHandle>,
    scheduled: u64,
}

/// Scheduler that never fires by itself; the caller delivers ticks.
///
/// Clones share state, so a test can keep one clone to inspect which
/// handles the session left active.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles scheduled and not yet cancelled, oldest first.
    #[must_use]
    pub fn active_handles(&self) -> Vec<TickHandle> {
        self.lock().active.clone()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().active.len()
    }

    /// Number of `schedule` calls since creation.
    #[must_use]
    pub fn scheduled_total(&self) -> u64 {
        self.lock().scheduled
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, _period: Duration) -> TickHandle {
        let mut state = self.lock();
        state.next_id += 1;
        state.scheduled += 1;
        let handle = TickHandle(state.next_id);
        state.active.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.lock().active.retain(|h| *h != handle);
    }
}

//
// ─── TOKIO ─────────────────────────────────────────────────────────────────────
//

/// Scheduler backed by one `tokio::time::interval` task per handle.
///
/// Each period the task sends its handle on the channel returned by
/// [`TokioTicker::new`]. `schedule` must be called inside a Tokio runtime.
/// A tick already queued when its handle is cancelled is still delivered,
/// which is why sessions compare handles on receipt.
#[derive(Debug)]
pub struct TokioTicker {
    next_id: u64,
    tx: mpsc::UnboundedSender<TickHandle>,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioTicker {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            next_id: 0,
            tx,
            tasks: HashMap::new(),
        };
        (ticker, rx)
    }

    /// Number of interval tasks still owned by the ticker.
    #[must_use]
    pub fn live_tasks(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            // First tick lands one full period after scheduling.
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticker_tracks_active_handles() {
        let mut ticker = ManualTicker::new();
        let observer = ticker.clone();

        let first = ticker.schedule(TICK_PERIOD);
        let second = ticker.schedule(TICK_PERIOD);
        assert_ne!(first, second);
        assert_eq!(observer.active_count(), 2);

        ticker.cancel(first);
        assert_eq!(observer.active_handles(), vec![second]);

        ticker.cancel(first);
        assert_eq!(observer.active_count(), 1);
        assert_eq!(observer.scheduled_total(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_delivers_every_period() {
        let (mut ticker, mut rx) = TokioTicker::new();
        let handle = ticker.schedule(TICK_PERIOD);

        let started = Instant::now();
        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(handle));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_stops_after_cancel() {
        let (mut ticker, mut rx) = TokioTicker::new();
        let handle = ticker.schedule(TICK_PERIOD);
        assert_eq!(rx.recv().await, Some(handle));

        ticker.cancel(handle);
        assert_eq!(ticker.live_tasks(), 0);

        let waited = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(waited.is_err(), "no tick expected after cancel");
    }
}
