//! Loop drivers: the periodic timers behind an active repeat loop.
//!
//! A driver only produces [`LoopTick`]s. Whoever owns the fold state feeds
//! them back to the navigator, which ignores ticks from drivers it no
//! longer holds.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverId(u64);

impl DriverId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// One period of a loop driver elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTick {
    pub driver: DriverId,
}

/// Start/stop surface of a periodic loop driver.
///
/// Stopping a driver that is already stopped must be a no-op.
pub trait LoopTimer {
    fn start(&mut self, period: Duration) -> DriverId;
    fn stop(&mut self, driver: DriverId);
}

/// Tokio-backed timer. Each driver is a task ticking on a
/// `tokio::time::interval` and sending into a shared channel.
///
/// Must be used from within a Tokio runtime.
pub struct TokioLoopTimer {
    ticks: mpsc::UnboundedSender<LoopTick>,
    tasks: HashMap<DriverId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioLoopTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LoopTick>) {
        let (ticks, rx) = mpsc::unbounded_channel();
        let timer = Self {
            ticks,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (timer, rx)
    }

    pub fn live_drivers(&self) -> usize {
        self.tasks.len()
    }
}

impl LoopTimer for TokioLoopTimer {
    fn start(&mut self, period: Duration) -> DriverId {
        let driver = DriverId(self.next_id);
        self.next_id += 1;

        let ticks = self.ticks.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if ticks.send(LoopTick { driver }).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(driver, handle);
        tracing::debug!(driver = driver.0, ?period, "loop driver started");
        driver
    }

    fn stop(&mut self, driver: DriverId) {
        if let Some(handle) = self.tasks.remove(&driver) {
            handle.abort();
            tracing::debug!(driver = driver.0, "loop driver stopped");
        }
    }
}

impl Drop for TokioLoopTimer {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

/// Timer that never fires on its own. Records starts and stops; ticks are
/// produced on demand with [`ManualLoopTimer::tick`].
#[derive(Debug, Default)]
pub struct ManualLoopTimer {
    live: HashSet<DriverId>,
    started: Vec<(DriverId, Duration)>,
    stopped: Vec<DriverId>,
    next_id: u64,
}

impl ManualLoopTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, driver: DriverId) -> bool {
        self.live.contains(&driver)
    }

    pub fn live_drivers(&self) -> usize {
        self.live.len()
    }

    pub fn started(&self) -> &[(DriverId, Duration)] {
        &self.started
    }

    pub fn stopped(&self) -> &[DriverId] {
        &self.stopped
    }

    /// A tick from `driver`, live or not.
    pub fn tick(&self, driver: DriverId) -> LoopTick {
        LoopTick { driver }
    }
}

impl LoopTimer for ManualLoopTimer {
    fn start(&mut self, period: Duration) -> DriverId {
        let driver = DriverId(self.next_id);
        self.next_id += 1;
        self.live.insert(driver);
        self.started.push((driver, period));
        driver
    }

    fn stop(&mut self, driver: DriverId) {
        if self.live.remove(&driver) {
            self.stopped.push(driver);
        }
    }
}
