//! Time sources for the crawl loop
//!
//! The stabilization loop and the inter-listing delay both read the clock and
//! sleep. Both go through [`Timing`] so tests can swap in a manual clock whose
//! sleeps return immediately and just advance time.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic clock
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Async sleep
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The process clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += by;
    }

    /// Total time advanced so far
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// A sleeper that returns at once, advancing a [`ManualClock`] and
/// recording every requested duration
#[derive(Debug)]
pub struct ManualSleeper {
    clock: Arc<ManualClock>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualSleeper {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Every duration slept so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Sleeper for ManualSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
        self.clock.advance(duration);
    }
}

/// Clock and sleeper used by a crawl
#[derive(Clone)]
pub struct Timing {
    pub clock: Arc<dyn Clock>,
    pub sleeper: Arc<dyn Sleeper>,
}

impl Timing {
    /// Real time
    pub fn system() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Manual time; returns the clock and sleeper handles for inspection
    pub fn manual() -> (Self, Arc<ManualClock>, Arc<ManualSleeper>) {
        let clock = Arc::new(ManualClock::new());
        let sleeper = Arc::new(ManualSleeper::new(clock.clone()));
        let timing = Self {
            clock: clock.clone(),
            sleeper: sleeper.clone(),
        };
        (timing, clock, sleeper)
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub async fn sleep(&self, duration: Duration) {
        self.sleeper.sleep(duration).await;
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::system()
    }
}
