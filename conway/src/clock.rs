// clock.rs - Recurring tick driver on the tokio runtime

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::LifeError;

/// Something the clock can ask to run exactly one tick.
///
/// `Break` ends the schedule after this tick; errors are logged and the
/// schedule carries on.
pub trait Ticker: Send + Sync + 'static {
    fn tick(&self) -> Result<ControlFlow<()>, LifeError>;
}

/// Two-state timer: stopped, or running a task that fires every interval.
///
/// The clock owns no grid; each firing is a call to [`Ticker::tick`].
#[derive(Debug)]
pub struct Clock {
    runtime: Handle,
    interval: watch::Sender<Duration>,
    task: Option<JoinHandle<()>>,
}

impl Clock {
    pub fn new(runtime: Handle, interval: Duration) -> Self {
        let (interval, _) = watch::channel(interval);
        Self {
            runtime,
            interval,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn interval(&self) -> Duration {
        *self.interval.borrow()
    }

    /// Begin firing `ticker` every interval. No-op if already running.
    pub fn start(&mut self, ticker: Arc<dyn Ticker>) {
        if self.is_running() {
            return;
        }
        let interval = self.interval.subscribe();
        tracing::info!(interval_ms = self.interval().as_millis() as u64, "Clock started");
        self.task = Some(self.runtime.spawn(run(ticker, interval)));
    }

    /// Cancel the schedule. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            // A tick never awaits, so aborting cannot land in the middle of one.
            task.abort();
            tracing::info!("Clock stopped");
        }
    }

    /// Change the period. A running schedule re-arms from now with the new
    /// interval; a stopped one uses it on the next start. Setting the current
    /// interval again leaves the schedule's phase alone.
    pub fn set_interval(&mut self, interval: Duration) {
        let changed = self.interval.send_if_modified(|current| {
            if *current == interval {
                return false;
            }
            *current = interval;
            true
        });
        if changed {
            tracing::info!(interval_ms = interval.as_millis() as u64, "Clock interval changed");
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(ticker: Arc<dyn Ticker>, mut interval: watch::Receiver<Duration>) {
    loop {
        let period = *interval.borrow_and_update();
        tokio::select! {
            () = tokio::time::sleep(period) => {}
            changed = interval.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        }

        match ticker.tick() {
            Ok(ControlFlow::Continue(())) => {}
            Ok(ControlFlow::Break(())) => {
                tracing::info!("Clock halted by ticker");
                break;
            }
            Err(err) => tracing::warn!(%err, "Scheduled tick failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct Counter {
        ticks: AtomicU64,
        halt_after: Option<u64>,
        fail: bool,
    }

    impl Ticker for Counter {
        fn tick(&self) -> Result<ControlFlow<()>, LifeError> {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(LifeError::OutOfBounds { row: 0, col: 0, height: 0, width: 0 });
            }
            match self.halt_after {
                Some(limit) if n >= limit => Ok(ControlFlow::Break(())),
                _ => Ok(ControlFlow::Continue(())),
            }
        }
    }

    impl Counter {
        fn count(&self) -> u64 {
            self.ticks.load(Ordering::SeqCst)
        }
    }

    fn clock(ms: u64) -> Clock {
        Clock::new(Handle::current(), Duration::from_millis(ms))
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_interval() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(1000);
        clock.start(counter.clone());
        assert!(clock.is_running());

        wait(3500).await;
        assert_eq!(counter.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_firing_means_no_ticks() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(1000);
        clock.start(counter.clone());
        clock.stop();
        assert!(!clock.is_running());

        wait(5000).await;
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_restart_works() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(100);
        clock.stop();
        clock.start(counter.clone());
        wait(250).await;
        clock.stop();
        clock.stop();
        wait(1000).await;
        assert_eq!(counter.count(), 2);

        clock.start(counter.clone());
        wait(150).await;
        assert_eq!(counter.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_keeps_one_schedule() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(100);
        clock.start(counter.clone());
        clock.start(counter.clone());
        wait(350).await;
        assert_eq!(counter.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_rearms_from_now() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(1000);
        clock.start(counter.clone());

        wait(500).await;
        clock.set_interval(Duration::from_millis(200));
        assert_eq!(clock.interval(), Duration::from_millis(200));

        // next firing at 700ms, not at 1000ms and not immediately
        wait(150).await;
        assert_eq!(counter.count(), 0);
        wait(100).await;
        assert_eq!(counter.count(), 1);
        wait(400).await;
        assert_eq!(counter.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn same_interval_keeps_phase() {
        let counter = Arc::new(Counter::default());
        let mut clock = clock(1000);
        clock.start(counter.clone());

        wait(500).await;
        clock.set_interval(Duration::from_millis(1000));

        // still fires at 1000ms, not re-armed to 1500ms
        wait(600).await;
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_ticks_do_not_stop_the_clock() {
        let counter = Arc::new(Counter { fail: true, ..Counter::default() });
        let mut clock = clock(100);
        clock.start(counter.clone());

        wait(450).await;
        assert_eq!(counter.count(), 4);
        assert!(clock.is_running());
        clock.stop();
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_can_halt_the_schedule() {
        let counter = Arc::new(Counter { halt_after: Some(2), ..Counter::default() });
        let mut clock = clock(100);
        clock.start(counter.clone());

        wait(1000).await;
        assert_eq!(counter.count(), 2);
        assert!(!clock.is_running());
    }
}
