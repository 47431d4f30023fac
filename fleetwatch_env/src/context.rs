//! Core environment context trait for Fleetwatch runtimes.

use crate::error::EnvError;
use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that the fleet runtime can run
/// both as a production service (tokio) and inside the deterministic
/// simulator (virtual clock + seeded RNG).
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, thread RNG
/// - **Simulation**: `SimContext` - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// Every source of non-determinism the fleet core touches (time, jitter)
/// goes through this trait, so a simulation run is reproducible from its seed.
#[async_trait]
pub trait FleetContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time.
    ///
    /// Used for notification timestamps and for the calendar day that
    /// debounces automatic work orders.
    fn system_time(&self) -> SystemTime;

    /// Returns the wall-clock time as milliseconds since the Unix epoch.
    fn unix_millis(&self) -> Result<u64, EnvError> {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| EnvError::clock(format!("system time before Unix epoch: {}", e)))
    }

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);

    /// Spawns a background task.
    fn spawn<F>(&self, name: &str, future: F)
    where
        F: Future<Output = ()> + Send + 'static;

    /// Draws a uniformly distributed value in `[0, 1)`.
    ///
    /// This is the only randomness the fleet core consumes. Jitter is always
    /// derived from it, never from a thread-local generator.
    fn random_unit(&self) -> f64;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
