//! Deterministic context for unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fleetwatch_env::FleetContext;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Replays a fixed list of random values and keeps a settable wall clock
/// (starting 2024-06-12 09:30 UTC).
pub(crate) struct StubContext {
    values: Vec<f64>,
    cursor: AtomicUsize,
    start: SystemTime,
    time: Mutex<SystemTime>,
}

impl StubContext {
    pub(crate) fn sequence(values: Vec<f64>) -> Self {
        assert!(!values.is_empty());
        let start = SystemTime::from(Utc.with_ymd_and_hms(2024, 6, 12, 9, 30, 0).unwrap());
        Self {
            values,
            cursor: AtomicUsize::new(0),
            start,
            time: Mutex::new(start),
        }
    }

    pub(crate) fn constant(value: f64) -> Self {
        Self::sequence(vec![value])
    }

    pub(crate) fn advance(&self, duration: Duration) {
        *self.time.lock().unwrap() += duration;
    }
}

#[async_trait]
impl FleetContext for StubContext {
    fn now(&self) -> Duration {
        self.system_time().duration_since(self.start).unwrap_or_default()
    }

    fn system_time(&self) -> SystemTime {
        *self.time.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn spawn<F>(&self, _name: &str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(future);
    }

    fn random_unit(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.values[i % self.values.len()]
    }

    fn seed(&self) -> u64 {
        0
    }
}
