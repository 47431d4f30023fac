//! Fleet Runtime - owns the fleet state and exposes every fleet operation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FleetRuntime                           │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Context: FleetContext                    │   │
//! │  │  • system_time() → notification stamps, "today"      │   │
//! │  │  • random_unit() → position/health/emission jitter   │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                              │                               │
//! │  ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌───────────────┐   │
//! │  │ Assets  │ │ ZoneIndex│ │ Transfers │ │ Notifications │   │
//! │  └─────────┘ └──────────┘ └───────────┘ └───────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The runtime is a plain single-owner struct: ticks and user actions are
//! `&mut self` methods. The async driver in [`crate::service`] wraps it in
//! one mutex so both go through the same serialization point.

use crate::compliance::{self, CabotagePriority};
use crate::error::{FleetError, SeedError};
use crate::geofence::ZoneIndex;
use crate::inventory;
use crate::lifecycle::{self, LifecycleAction, TransitionOutcome};
use crate::model::{Asset, AssetStatus, Transfer, TransferStatus, WorkOrderStatus, Zone};
use crate::notifications::{
    Notification, NotificationConfig, NotificationDraft, NotificationLog, SYSTEM_ASSET_ID,
};
use crate::seed::FleetSeed;
use crate::simulation::{SimulationConfig, SimulationEngine, SimulationError};
use crate::work_order;

use chrono::{DateTime, Utc};
use fleetwatch_env::FleetContext;
use h3o::Resolution;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Configuration for a fleet runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub simulation: SimulationConfig,
    pub notifications: NotificationConfig,
    /// H3 resolution for the zone index (default: 7)
    pub h3_resolution: u8,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            notifications: NotificationConfig::default(),
            h3_resolution: 7,
        }
    }
}

/// Summary of one asset tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick number (0 when the tick was skipped because of pause)
    pub tick: u64,
    pub paused: bool,
    pub assets_stepped: usize,
    pub tickets_opened: Vec<String>,
    pub notifications: usize,
    /// Assets skipped this tick, with the reason
    pub failures: Vec<SimulationError>,
}

/// Summary of one transfer tick.
#[derive(Debug, Clone, Default)]
pub struct TransferTickReport {
    pub paused: bool,
    pub transfers_moved: usize,
    pub failures: Vec<SimulationError>,
}

/// Result of advancing a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketProgress {
    pub asset_id: String,
    pub ticket_id: String,
    pub from: WorkOrderStatus,
    pub to: WorkOrderStatus,
    pub restored: bool,
}

/// Point-in-time view of the fleet for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    pub captured_at_ms: u64,
    pub tick_count: u64,
    pub paused: bool,
    pub unread_count: usize,
    pub assets: Vec<Asset>,
    pub transfers: Vec<Transfer>,
    pub notifications: Vec<Notification>,
}

/// The fleet state owner.
pub struct FleetRuntime<Ctx: FleetContext> {
    context: Arc<Ctx>,
    config: RuntimeConfig,
    engine: SimulationEngine,

    /// Seed kept for `reset`
    seed: FleetSeed,

    assets: Vec<Asset>,
    zones: ZoneIndex,
    transfers: Vec<Transfer>,
    notifications: NotificationLog,

    /// Pause flag; the service loops subscribe to it
    pause_tx: watch::Sender<bool>,
    tick_count: u64,
}

impl<Ctx: FleetContext> FleetRuntime<Ctx> {
    /// Creates a runtime from a validated seed.
    pub fn new(context: Arc<Ctx>, seed: FleetSeed, config: RuntimeConfig) -> Result<Self, SeedError> {
        seed.validate()?;

        let resolution = Resolution::try_from(config.h3_resolution).unwrap_or(Resolution::Seven);
        let zones = ZoneIndex::with_resolution(seed.zones.clone(), resolution);
        let engine = SimulationEngine::new(config.simulation.clone());
        let notifications = NotificationLog::new(config.notifications.clone());

        info!(
            "Fleet runtime ready: {} assets, {} zones, {} transfers (seed={})",
            seed.assets.len(),
            seed.zones.len(),
            seed.transfers.len(),
            context.seed()
        );

        Ok(Self {
            context,
            config,
            engine,
            assets: seed.assets.clone(),
            transfers: seed.transfers.clone(),
            seed,
            zones,
            notifications,
            pause_tx: watch::channel(false).0,
            tick_count: 0,
        })
    }

    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn wall_clock(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.context.system_time())
    }

    fn dispatch(&mut self, draft: NotificationDraft, at: DateTime<Utc>) {
        debug!("[{:?}] {}: {}", draft.kind, draft.title, draft.message);
        self.notifications.push(draft, at);
    }

    // =========================================================================
    // TICKS
    // =========================================================================

    /// Advances every active asset by one tick. A no-op while paused.
    pub fn tick(&mut self) -> TickReport {
        if self.is_paused() {
            return TickReport {
                paused: true,
                ..Default::default()
            };
        }

        self.tick_count += 1;
        let now = self.wall_clock();
        let mut report = TickReport {
            tick: self.tick_count,
            ..Default::default()
        };

        for i in 0..self.assets.len() {
            if !self.assets[i].status.is_operating() {
                continue;
            }

            match self
                .engine
                .step_asset(&self.assets[i], &self.zones, self.context.as_ref(), now)
            {
                Ok(step) => {
                    self.assets[i] = step.asset;
                    report.assets_stepped += 1;
                    report.notifications += step.notifications.len();
                    if let Some(ticket) = step.opened_ticket {
                        info!("Automatic work order {} opened", ticket);
                        report.tickets_opened.push(ticket);
                    }
                    for draft in step.notifications {
                        self.dispatch(draft, now);
                    }
                }
                Err(e) => {
                    warn!("Tick {}: skipping asset update: {}", self.tick_count, e);
                    report.failures.push(e);
                }
            }
        }

        report
    }

    /// Moves every in-flight transfer by one tick. A no-op while paused.
    pub fn tick_transfers(&mut self) -> TransferTickReport {
        if self.is_paused() {
            return TransferTickReport {
                paused: true,
                ..Default::default()
            };
        }

        let mut report = TransferTickReport::default();
        for i in 0..self.transfers.len() {
            if !self.transfers[i].is_moving() {
                continue;
            }
            match self.engine.step_transfer(&self.transfers[i], self.context.as_ref()) {
                Ok(next) => {
                    self.transfers[i] = next;
                    report.transfers_moved += 1;
                }
                Err(e) => {
                    warn!("Skipping transfer update: {}", e);
                    report.failures.push(e);
                }
            }
        }
        report
    }

    /// Flips the pause flag and returns the new value. Subscribers are
    /// woken on every flip.
    pub fn toggle_simulation_pause(&mut self) -> bool {
        let paused = !self.is_paused();
        self.pause_tx.send_replace(paused);
        info!("Simulation {}", if paused { "paused" } else { "resumed" });
        paused
    }

    pub fn is_paused(&self) -> bool {
        *self.pause_tx.borrow()
    }

    /// Receiver that observes every pause flip.
    pub fn subscribe_pause(&self) -> watch::Receiver<bool> {
        self.pause_tx.subscribe()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Restores assets and transfers to the seed and clears notifications.
    /// The pause flag is left as it is.
    pub fn reset(&mut self) {
        self.assets = self.seed.assets.clone();
        self.transfers = self.seed.transfers.clone();
        self.notifications.clear();
        self.tick_count = 0;
        info!("Fleet reset to seed ({} assets)", self.assets.len());
    }

    // =========================================================================
    // LIFECYCLE ACTIONS
    // =========================================================================

    fn asset_index(&self, asset_id: &str) -> Result<usize, FleetError> {
        self.assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| FleetError::AssetNotFound(asset_id.to_string()))
    }

    fn apply_lifecycle(&mut self, asset_id: &str, action: LifecycleAction) -> Result<TransitionOutcome, FleetError> {
        let idx = self.asset_index(asset_id)?;
        let outcome = lifecycle::apply(self.assets[idx].status, action);

        match outcome {
            TransitionOutcome::Applied { from, to } => {
                self.assets[idx].status = to;
                info!("{}: {} -> {} ({})", self.assets[idx].number, from, to, action);
                let draft = NotificationDraft::info(
                    asset_id,
                    "Status Changed",
                    format!("{} moved from {} to {}", self.assets[idx].number, from, to),
                );
                let now = self.wall_clock();
                self.dispatch(draft, now);
            }
            TransitionOutcome::Ignored { state, action } => {
                warn!(
                    "{}: action {} does not apply to state {}, ignored",
                    self.assets[idx].number, action, state
                );
            }
        }

        Ok(outcome)
    }

    /// Submits documents. Leaving `Catalog_Filling` for `Verification`
    /// requires the asset to pass the readiness check.
    pub fn submit_for_verification(&mut self, asset_id: &str) -> Result<TransitionOutcome, FleetError> {
        let idx = self.asset_index(asset_id)?;
        let asset = &self.assets[idx];
        if asset.status == AssetStatus::CatalogFilling {
            if let Err(e) = compliance::validate_asset_readiness(asset) {
                warn!("{}: submission refused: {}", asset.number, e);
                return Err(e.into());
            }
        }
        self.apply_lifecycle(asset_id, LifecycleAction::SubmitDocs)
    }

    pub fn approve(&mut self, asset_id: &str) -> Result<TransitionOutcome, FleetError> {
        self.apply_lifecycle(asset_id, LifecycleAction::Approve)
    }

    pub fn reject(&mut self, asset_id: &str) -> Result<TransitionOutcome, FleetError> {
        self.apply_lifecycle(asset_id, LifecycleAction::Reject)
    }

    pub fn start_maintenance(&mut self, asset_id: &str) -> Result<TransitionOutcome, FleetError> {
        self.apply_lifecycle(asset_id, LifecycleAction::Maintenance)
    }

    pub fn restore(&mut self, asset_id: &str) -> Result<TransitionOutcome, FleetError> {
        self.apply_lifecycle(asset_id, LifecycleAction::Restore)
    }

    /// Runs the readiness check without changing anything.
    pub fn check_readiness(&self, asset_id: &str) -> Result<(), FleetError> {
        let idx = self.asset_index(asset_id)?;
        compliance::validate_asset_readiness(&self.assets[idx])?;
        Ok(())
    }

    pub fn cabotage_priority(&self, asset_id: &str) -> Result<CabotagePriority, FleetError> {
        let idx = self.asset_index(asset_id)?;
        Ok(compliance::calculate_cabotage_priority(&self.assets[idx]))
    }

    // =========================================================================
    // MAINTENANCE & INVENTORY
    // =========================================================================

    /// Moves a work order one status forward. Completing the ticket of an
    /// asset in automation downtime brings it back to `Active` at full health.
    pub fn advance_ticket(&mut self, ticket_id: &str) -> Result<TicketProgress, FleetError> {
        let idx = self
            .assets
            .iter()
            .position(|a| a.ticket(ticket_id).is_some())
            .ok_or_else(|| FleetError::TicketNotFound(ticket_id.to_string()))?;

        let step = work_order::advance_ticket(&self.assets[idx], ticket_id)
            .ok_or_else(|| FleetError::TicketNotFound(ticket_id.to_string()))?;

        let progress = TicketProgress {
            asset_id: step.asset.id.clone(),
            ticket_id: ticket_id.to_string(),
            from: step.from,
            to: step.to,
            restored: step.restored,
        };
        self.assets[idx] = step.asset;

        if progress.from == progress.to {
            debug!("Work order {} already {}", ticket_id, progress.to);
        } else {
            info!("Work order {}: {} -> {}", ticket_id, progress.from, progress.to);
        }
        if progress.restored {
            let draft = NotificationDraft::info(
                &progress.asset_id,
                "Asset Restored",
                format!("{} is back in service after {}", self.assets[idx].number, ticket_id),
            );
            let now = self.wall_clock();
            self.dispatch(draft, now);
        }

        Ok(progress)
    }

    /// Consumes one unit of a part. Returns the remaining quantity.
    pub fn use_inventory_part(&mut self, asset_id: &str, part_id: &str) -> Result<u32, FleetError> {
        let idx = self.asset_index(asset_id)?;
        let now = self.wall_clock();

        let mut next = self.assets[idx].clone();
        let part = next
            .inventory
            .iter_mut()
            .find(|p| p.id == part_id)
            .ok_or_else(|| FleetError::PartNotFound {
                asset_id: asset_id.to_string(),
                part_id: part_id.to_string(),
            })?;

        if !inventory::take_one(part, now) {
            return Err(FleetError::Stockout {
                asset_id: asset_id.to_string(),
                part: part.name.clone(),
            });
        }
        let remaining = part.quantity;
        let low = part.is_below_min().then(|| (part.name.clone(), part.min_level));

        self.assets[idx] = next;

        if let Some((name, min_level)) = low {
            let draft = NotificationDraft::warning(
                asset_id,
                "Low Stock",
                format!(
                    "{} on {} is at {} (minimum {})",
                    name, self.assets[idx].number, remaining, min_level
                ),
            );
            self.dispatch(draft, now);
        }

        Ok(remaining)
    }

    // =========================================================================
    // TRANSFERS
    // =========================================================================

    /// Marks a transfer as received at its destination.
    pub fn receive_transfer(&mut self, transfer_id: &str) -> Result<(), FleetError> {
        let now = self.wall_clock();
        let transfer = self
            .transfers
            .iter_mut()
            .find(|t| t.id == transfer_id)
            .ok_or_else(|| FleetError::TransferNotFound(transfer_id.to_string()))?;

        if transfer.status == TransferStatus::Received {
            return Ok(());
        }
        transfer.status = TransferStatus::Received;
        transfer.coordinates = transfer.destination;

        let draft = NotificationDraft::info(
            SYSTEM_ASSET_ID,
            "Transfer Received",
            format!("{} arrived at {}", transfer.reference, transfer.destination_name),
        );
        self.dispatch(draft, now);
        Ok(())
    }

    // =========================================================================
    // QUERIES & NOTIFICATIONS
    // =========================================================================

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn zones(&self) -> &[Zone] {
        self.zones.zones()
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn mark_as_read(&mut self, notification_id: &str) -> bool {
        self.notifications.mark_as_read(notification_id)
    }

    pub fn mark_all_as_read(&mut self) {
        self.notifications.mark_all_as_read();
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn snapshot(&self) -> Result<FleetSnapshot, FleetError> {
        Ok(FleetSnapshot {
            captured_at_ms: self.context.unix_millis()?,
            tick_count: self.tick_count,
            paused: self.is_paused(),
            unread_count: self.unread_count(),
            assets: self.assets.clone(),
            transfers: self.transfers.clone(),
            notifications: self.notifications.to_vec(),
        })
    }
}
