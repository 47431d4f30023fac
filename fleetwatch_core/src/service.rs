//! Async tick driver around a [`FleetRuntime`].
//!
//! Two loops run on the context's executor: one steps the assets, one moves
//! the transfers. Both share the runtime mutex with user actions, so a tick
//! never observes a half-applied action and vice versa.
//!
//! Pausing stops both loops. Resuming restarts the interval from the moment
//! of the resume; missed ticks are not replayed. The loops watch the
//! runtime's own pause flag, so a flip made through `lock` counts the same.

use crate::runtime::FleetRuntime;
use fleetwatch_env::FleetContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info};

/// Handle to a running fleet.
pub struct FleetService<Ctx: FleetContext> {
    runtime: Arc<Mutex<FleetRuntime<Ctx>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl<Ctx: FleetContext> FleetService<Ctx> {
    /// Takes ownership of the runtime and starts the tick loops.
    pub fn start(runtime: FleetRuntime<Ctx>) -> Self {
        let ctx = Arc::clone(runtime.context());
        let interval = runtime.config().simulation.tick_interval;
        let assets_pause_rx = runtime.subscribe_pause();
        let transfers_pause_rx = runtime.subscribe_pause();
        let (shutdown_tx, _) = watch::channel(false);
        let runtime = Arc::new(Mutex::new(runtime));

        ctx.spawn(
            "fleet-assets",
            drive(
                "assets",
                Arc::clone(&runtime),
                Arc::clone(&ctx),
                interval,
                assets_pause_rx,
                shutdown_tx.subscribe(),
                |rt| {
                    let report = rt.tick();
                    debug!(
                        "Tick {}: {} assets stepped, {} notifications",
                        report.tick, report.assets_stepped, report.notifications
                    );
                },
            ),
        );
        ctx.spawn(
            "fleet-transfers",
            drive(
                "transfers",
                Arc::clone(&runtime),
                Arc::clone(&ctx),
                interval,
                transfers_pause_rx,
                shutdown_tx.subscribe(),
                |rt| {
                    rt.tick_transfers();
                },
            ),
        );

        info!("Fleet service started (interval={:?})", interval);
        Self { runtime, shutdown_tx }
    }

    /// Locks the runtime for queries and user actions.
    pub async fn lock(&self) -> MutexGuard<'_, FleetRuntime<Ctx>> {
        self.runtime.lock().await
    }

    pub fn runtime(&self) -> Arc<Mutex<FleetRuntime<Ctx>>> {
        Arc::clone(&self.runtime)
    }

    /// Flips the pause flag and wakes the loops. Returns the new value.
    pub async fn toggle_simulation_pause(&self) -> bool {
        self.runtime.lock().await.toggle_simulation_pause()
    }

    /// Stops both loops. The runtime stays readable through `lock`.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        info!("Fleet service shutting down");
    }
}

impl<Ctx: FleetContext> Drop for FleetService<Ctx> {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

async fn drive<Ctx, F>(
    name: &'static str,
    runtime: Arc<Mutex<FleetRuntime<Ctx>>>,
    ctx: Arc<Ctx>,
    interval: Duration,
    mut pause_rx: watch::Receiver<bool>,
    mut shutdown_rx: watch::Receiver<bool>,
    step: F,
) where
    Ctx: FleetContext,
    F: Fn(&mut FleetRuntime<Ctx>) + Send + 'static,
{
    loop {
        if *shutdown_rx.borrow_and_update() {
            break;
        }

        if *pause_rx.borrow_and_update() {
            tokio::select! {
                changed = pause_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {}
            }
            continue;
        }

        tokio::select! {
            _ = ctx.sleep(interval) => {
                let mut rt = runtime.lock().await;
                step(&mut rt);
            }
            changed = pause_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = shutdown_rx.changed() => {}
        }
    }

    debug!("{} loop stopped", name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Asset, AssetCategory, AssetStatus, Coordinates};
    use crate::runtime::RuntimeConfig;
    use crate::seed::FleetSeed;
    use fleetwatch_env::TokioContext;

    fn service() -> FleetService<TokioContext> {
        let mut vessel = Asset::new("V1", "TB-ANOA-01", AssetCategory::Vessel, Coordinates::new(-3.0, 110.0));
        vessel.status = AssetStatus::Active;
        let seed = FleetSeed {
            assets: vec![vessel],
            ..Default::default()
        };
        let runtime = FleetRuntime::new(TokioContext::shared(), seed, RuntimeConfig::default()).unwrap();
        FleetService::start(runtime)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_interval() {
        let service = service();

        tokio::time::sleep(Duration::from_secs(7)).await;
        let rt = service.lock().await;
        assert_eq!(rt.tick_count(), 3);
        assert_eq!(rt.asset("V1").unwrap().history.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_and_resume_restarts_interval() {
        let service = service();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(service.toggle_simulation_pause().await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(service.lock().await.tick_count(), 0);

        assert!(!service.toggle_simulation_pause().await);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(service.lock().await.tick_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_through_lock_restarts_interval() {
        let service = service();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(service.lock().await.toggle_simulation_pause());

        tokio::time::sleep(Duration::from_millis(11_800)).await;
        assert!(!service.lock().await.toggle_simulation_pause());

        // The old phase would have fired at 12 s
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(service.lock().await.tick_count(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(service.lock().await.tick_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let service = service();

        tokio::time::sleep(Duration::from_secs(3)).await;
        service.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(service.lock().await.tick_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_actions_share_the_runtime() {
        let service = service();

        tokio::time::sleep(Duration::from_secs(3)).await;
        {
            let mut rt = service.lock().await;
            rt.start_maintenance("V1").unwrap();
        }
        tokio::time::sleep(Duration::from_secs(4)).await;

        let rt = service.lock().await;
        // Ticks keep running but a Maintenance asset is not stepped
        assert_eq!(rt.tick_count(), 3);
        assert_eq!(rt.asset("V1").unwrap().history.len(), 1);
    }
}
