//! The simulation engine - per-tick evolution of assets and transfers.
//!
//! Each step takes an immutable record and returns the updated copy plus the
//! notifications it produced. The runtime commits the copy only when the step
//! succeeds, so an asset whose update fails keeps its previous state.

use crate::geofence::{zone_change, ZoneChange, ZoneIndex};
use crate::model::{Asset, AssetCategory, Coordinates, Transfer};
use crate::notifications::NotificationDraft;
use crate::work_order::{self, AutomationOutcome, DEFAULT_HEALTH_THRESHOLD};
use chrono::{DateTime, Utc};
use fleetwatch_env::FleetContext;
use std::time::Duration;
use thiserror::Error;

/// Configuration for the simulation engine.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Interval between ticks (default: 2 s)
    pub tick_interval: Duration,

    /// Peak-to-peak positional jitter for vessels, in degrees
    pub vessel_jitter_deg: f64,

    /// Peak-to-peak positional jitter for rigs, in degrees
    pub rig_jitter_deg: f64,

    /// Peak-to-peak health jitter per tick
    pub health_jitter: f64,

    /// Constant health change per tick (negative degrades)
    pub health_drift: f64,

    /// Maximum extra emissions per tick, in tonnes
    pub emission_jitter: f64,

    /// Health below which a work order is opened
    pub health_threshold: f64,

    /// Fraction of the remaining distance a transfer covers per tick
    pub transfer_step: f64,

    /// Peak-to-peak transfer jitter, in degrees
    pub transfer_jitter_deg: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(2),
            vessel_jitter_deg: 0.008,
            rig_jitter_deg: 0.0005,
            health_jitter: 0.5,
            health_drift: 0.0,
            emission_jitter: 0.0005,
            health_threshold: DEFAULT_HEALTH_THRESHOLD,
            transfer_step: 0.05,
            transfer_jitter_deg: 0.002,
        }
    }
}

impl SimulationConfig {
    pub fn jitter_for(&self, category: AssetCategory) -> f64 {
        match category {
            AssetCategory::Vessel => self.vessel_jitter_deg,
            AssetCategory::OffshoreRig | AssetCategory::OnshoreRig => self.rig_jitter_deg,
        }
    }
}

/// Title of the notification emitted when an asset enters a zone.
pub const ZONE_ENTRY_TITLE: &str = "Zone Entry";

/// Failures that isolate one record from the rest of the tick.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("asset {asset_id} would move to a non-finite position")]
    NonFinitePosition { asset_id: String },

    #[error("asset {asset_id} has non-finite {field}")]
    NonFiniteValue { asset_id: String, field: &'static str },

    #[error("transfer {transfer_id} would move to a non-finite position")]
    NonFiniteTransfer { transfer_id: String },
}

/// The result of one asset tick.
#[derive(Debug, Clone)]
pub struct AssetStep {
    pub asset: Asset,
    pub notifications: Vec<NotificationDraft>,
    /// Id of the automatic ticket opened during this step
    pub opened_ticket: Option<String>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Uniform value in [-0.5, 0.5) from the context's random source.
fn centered<Ctx: FleetContext + ?Sized>(ctx: &Ctx) -> f64 {
    ctx.random_unit() - 0.5
}

/// Drives per-tick evolution.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Advances one active asset by one tick.
    pub fn step_asset<Ctx: FleetContext + ?Sized>(
        &self,
        asset: &Asset,
        zones: &ZoneIndex,
        ctx: &Ctx,
        now: DateTime<Utc>,
    ) -> Result<AssetStep, SimulationError> {
        if !asset.health.is_finite() {
            return Err(SimulationError::NonFiniteValue {
                asset_id: asset.id.clone(),
                field: "health",
            });
        }
        if !asset.total_emissions.is_finite() || !asset.co2_emissions.is_finite() {
            return Err(SimulationError::NonFiniteValue {
                asset_id: asset.id.clone(),
                field: "emissions",
            });
        }

        let mut next = asset.clone();
        let mut notifications = Vec::new();

        // 1-2. Position and history
        let scale = self.config.jitter_for(asset.category);
        let position = asset
            .coordinates
            .offset(centered(ctx) * scale, centered(ctx) * scale);
        if !position.is_finite() {
            return Err(SimulationError::NonFinitePosition {
                asset_id: asset.id.clone(),
            });
        }
        next.move_to(position);

        // 3. Geofence
        match zone_change(asset.current_zone_id.as_deref(), zones.detect(&position)) {
            ZoneChange::Entered(zone) => {
                notifications.push(NotificationDraft::info(
                    &asset.id,
                    ZONE_ENTRY_TITLE,
                    format!("{} entered {}", asset.number, zone.name),
                ));
                next.current_zone_id = Some(zone.id.clone());
            }
            ZoneChange::Left(previous) => {
                tracing::debug!("{} left zone {}", asset.number, previous);
                next.current_zone_id = None;
            }
            ZoneChange::Unchanged => {}
        }

        // 4. Health
        let health = asset.health + centered(ctx) * self.config.health_jitter + self.config.health_drift;
        next.health = round_to(health.clamp(0.0, 100.0), 2);

        // 5. Emissions
        let hours = self.config.tick_interval.as_secs_f64() / 3600.0;
        let increment = (asset.co2_emissions * hours).max(0.0) + ctx.random_unit() * self.config.emission_jitter;
        next.total_emissions = round_to(asset.total_emissions + increment, 4).max(asset.total_emissions);

        // 6. Work-order automation
        let mut opened_ticket = None;
        if let AutomationOutcome::Opened(ticket) =
            work_order::run_automation(&next, self.config.health_threshold, now)
        {
            let ticket = *ticket;
            opened_ticket = Some(ticket.ticket_id);
            notifications.extend(ticket.notifications);
            next = ticket.asset;
        }

        Ok(AssetStep {
            asset: next,
            notifications,
            opened_ticket,
        })
    }

    /// Moves an in-flight transfer a step toward its destination.
    /// Received transfers are returned unchanged.
    pub fn step_transfer<Ctx: FleetContext + ?Sized>(
        &self,
        transfer: &Transfer,
        ctx: &Ctx,
    ) -> Result<Transfer, SimulationError> {
        if !transfer.is_moving() {
            return Ok(transfer.clone());
        }

        let step = self.config.transfer_step.clamp(0.0, 1.0);
        let jitter = self.config.transfer_jitter_deg;
        let d_lat = (transfer.destination.lat - transfer.coordinates.lat) * step + centered(ctx) * jitter;
        let d_lng = (transfer.destination.lng - transfer.coordinates.lng) * step + centered(ctx) * jitter;

        let position: Coordinates = transfer.coordinates.offset(d_lat, d_lng);
        if !position.is_finite() {
            return Err(SimulationError::NonFiniteTransfer {
                transfer_id: transfer.id.clone(),
            });
        }

        let mut next = transfer.clone();
        next.coordinates = position;
        Ok(next)
    }
}
