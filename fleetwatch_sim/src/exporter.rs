//! JSON exporter for scenario playback.
//!
//! Exports simulation frames as JSON so a run can be replayed on a map.

use fleetwatch_core::{Asset, AssetStatus, Notification, NotificationKind, Transfer, TransferStatus};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Simulation time in seconds
    pub time_sec: f64,

    /// Runtime tick counter at capture time
    pub tick: u64,

    pub assets: Vec<AssetPosition>,

    pub transfers: Vec<TransferPosition>,

    /// Notifications emitted since the previous frame
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<SimEvent>,
}

/// Position and condition of an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPosition {
    pub id: String,
    pub number: String,
    pub status: AssetStatus,
    pub lat: f64,
    pub lng: f64,
    pub health: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl From<&Asset> for AssetPosition {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            number: asset.number.clone(),
            status: asset.status,
            lat: asset.coordinates.lat,
            lng: asset.coordinates.lng,
            health: asset.health,
            zone_id: asset.current_zone_id.clone(),
        }
    }
}

/// Position of a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferPosition {
    pub id: String,
    pub status: TransferStatus,
    pub lat: f64,
    pub lng: f64,
}

impl From<&Transfer> for TransferPosition {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: transfer.id.clone(),
            status: transfer.status,
            lat: transfer.coordinates.lat,
            lng: transfer.coordinates.lng,
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub asset_id: String,
    pub message: String,
    pub level: NotificationKind,
}

impl From<&Notification> for SimEvent {
    fn from(n: &Notification) -> Self {
        Self {
            asset_id: n.asset_id.clone(),
            message: format!("{}: {}", n.title, n.message),
            level: n.kind,
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>) {
        self.passed = passed;
        self.failure_reason = failure_reason;
    }

    /// Writes to a JSON file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::demo_assets;

    #[test]
    fn test_frame_json_shape() {
        let assets = demo_assets();
        let frame = SimFrame {
            time_sec: 2.0,
            tick: 1,
            assets: assets.iter().map(AssetPosition::from).collect(),
            transfers: Vec::new(),
            events: Vec::new(),
        };

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["assets"][0]["id"], "V-001");
        assert_eq!(value["assets"][0]["status"], "Active");
        // Empty event lists are omitted
        assert!(value.get("events").is_none());
    }

    #[test]
    fn test_export_tracks_duration() {
        let mut export = SimExport::new("patrol", 42);
        for tick in 1..=3 {
            export.add_frame(SimFrame {
                time_sec: tick as f64 * 2.0,
                tick,
                assets: Vec::new(),
                transfers: Vec::new(),
                events: Vec::new(),
            });
        }
        export.finalize(true, None);

        assert_eq!(export.duration_sec, 6.0);
        assert_eq!(export.frames.len(), 3);
        let json = serde_json::to_string(&export).unwrap();
        assert!(!json.contains("failure_reason"));
    }
}
