//! Recurring status poll feeding a single display slot
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::label::StatusLabel;
use super::service::{running_from, ServiceSupervisor};

/// Shortest accepted poll period
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Where the most recent poll stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Last poll answered, or nothing polled yet
    Idle,
    Polling,
    /// Last poll could not read the status and reported not running
    Failed,
}

struct Probe {
    supervisor: Arc<dyn ServiceSupervisor>,
    service: String,
    instance: String,
    slot: watch::Sender<StatusLabel>,
    state: watch::Sender<PollState>,
}

impl Probe {
    /// One best-effort poll. Never fails: lookup errors publish not running.
    async fn poll_once(&self) -> StatusLabel {
        self.state.send_replace(PollState::Polling);

        let running = match self.supervisor.list(&self.service).await {
            Ok(res) => running_from(&res, &self.service, &self.instance),
            Err(e) => Err(e),
        };
        let (label, state) = match running {
            Ok(running) => (StatusLabel::from_running(running), PollState::Idle),
            Err(e) => {
                debug!("Status lookup for {} failed: {}", self.service, e);
                (StatusLabel::NotRunning, PollState::Failed)
            }
        };

        // last write wins, a straggling poll may briefly overwrite a newer label
        self.slot.send_replace(label);
        self.state.send_replace(state);
        label
    }
}

/// Handle for the status poll loop.
///
/// Nothing runs until [`StatusPoller::start`]; [`StatusPoller::stop`] or
/// dropping the handle cancels the timer along with any poll in flight.
pub struct StatusPoller {
    probe: Arc<Probe>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl StatusPoller {
    pub fn new(
        supervisor: Arc<dyn ServiceSupervisor>,
        service: impl Into<String>,
        instance: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let (slot, _) = watch::channel(StatusLabel::Collecting);
        let (state, _) = watch::channel(PollState::Idle);
        StatusPoller {
            probe: Arc::new(Probe {
                supervisor,
                service: service.into(),
                instance: instance.into(),
                slot,
                state,
            }),
            interval: interval.max(MIN_INTERVAL),
            task: None,
        }
    }

    /// Follow the display slot
    pub fn subscribe(&self) -> watch::Receiver<StatusLabel> {
        self.probe.slot.subscribe()
    }

    /// Current content of the display slot
    pub fn label(&self) -> StatusLabel {
        *self.probe.slot.borrow()
    }

    pub fn state(&self) -> PollState {
        *self.probe.state.borrow()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll once right now, without the timer
    pub async fn tick(&self) -> StatusLabel {
        self.probe.poll_once().await
    }

    pub fn is_started(&self) -> bool {
        self.task.is_some()
    }

    /// Register the timer. The first poll fires immediately; calling
    /// `start` on a started poller does nothing.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        info!(
            "Polling {} every {:?}",
            self.probe.service, self.interval
        );

        let probe = Arc::clone(&self.probe);
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // ticks never wait for a slow poll, so several may be in flight
            let mut inflight = JoinSet::new();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let probe = Arc::clone(&probe);
                        inflight.spawn(async move {
                            probe.poll_once().await;
                        });
                    }
                    Some(_) = inflight.join_next(), if !inflight.is_empty() => {}
                }
            }
        }));
    }

    /// Cancel the timer and any poll still running
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Stopped polling {}", self.probe.service);
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusLookupError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl ServiceSupervisor for Counting {
        async fn list(&self, _service: &str) -> Result<Value, StatusLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
            Ok(json!({ "easytier": { "instances": { "instance1": { "running": true } } } }))
        }
    }

    fn counting(delay: Duration) -> Arc<Counting> {
        Arc::new(Counting {
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    #[tokio::test]
    async fn slot_starts_collecting() {
        let poller = StatusPoller::new(counting(Duration::ZERO), "easytier", "instance1", Duration::from_secs(5));
        assert_eq!(poller.label(), StatusLabel::Collecting);
        assert_eq!(poller.state(), PollState::Idle);
        assert!(!poller.is_started());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_polls_until_stopped() {
        let supervisor = counting(Duration::ZERO);
        let mut poller = StatusPoller::new(
            supervisor.clone(),
            "easytier",
            "instance1",
            Duration::from_secs(5),
        );
        let mut slot = poller.subscribe();

        poller.start();
        poller.start();
        slot.changed().await.unwrap();
        assert_eq!(*slot.borrow(), StatusLabel::Running);

        time::sleep(Duration::from_secs(11)).await;
        let polled = supervisor.calls.load(Ordering::SeqCst);
        assert!(polled >= 2, "only {polled} polls");

        poller.stop();
        assert!(!poller.is_started());
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(supervisor.calls.load(Ordering::SeqCst), polled);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_polls_do_not_hold_back_ticks() {
        let supervisor = counting(Duration::from_secs(7));
        let mut poller = StatusPoller::new(
            supervisor.clone(),
            "easytier",
            "instance1",
            Duration::from_secs(5),
        );
        poller.start();
        time::sleep(Duration::from_secs(16)).await;
        assert!(supervisor.calls.load(Ordering::SeqCst) >= 3);
        drop(poller);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let poller = StatusPoller::new(counting(Duration::ZERO), "easytier", "instance1", Duration::ZERO);
        assert_eq!(poller.interval(), MIN_INTERVAL);
    }
}
