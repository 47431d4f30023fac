//! Fleet domain model
//!
//! Assets (vessels and rigs), geofence zones, spare parts, work orders and
//! logistics transfers. Everything here is plain data; behaviour lives in
//! the engine modules that take these records and return updated copies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of past positions kept on an asset.
pub const HISTORY_LIMIT: usize = 20;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the position shifted by the given deltas (degrees).
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Asset category. Drives movement scale, readiness rules and the
/// critical spare part reserved by work-order automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "Vessel")]
    Vessel,
    #[serde(rename = "Offshore Rig")]
    OffshoreRig,
    #[serde(rename = "Onshore Rig")]
    OnshoreRig,
}

impl AssetCategory {
    pub fn name(&self) -> &'static str {
        match self {
            AssetCategory::Vessel => "Vessel",
            AssetCategory::OffshoreRig => "Offshore Rig",
            AssetCategory::OnshoreRig => "Onshore Rig",
        }
    }

    pub fn is_rig(&self) -> bool {
        matches!(self, AssetCategory::OffshoreRig | AssetCategory::OnshoreRig)
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operational status of an asset.
///
/// `Inactive` is the downtime state set by work-order automation;
/// `Maintenance` is the manually entered lifecycle state. Both mean
/// "not operating" but only `Maintenance` is part of the lifecycle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    Registered,
    #[serde(rename = "Catalog_Filling")]
    CatalogFilling,
    Verification,
    Active,
    Inactive,
    Maintenance,
}

impl AssetStatus {
    pub fn name(&self) -> &'static str {
        match self {
            AssetStatus::Registered => "Registered",
            AssetStatus::CatalogFilling => "Catalog_Filling",
            AssetStatus::Verification => "Verification",
            AssetStatus::Active => "Active",
            AssetStatus::Inactive => "Inactive",
            AssetStatus::Maintenance => "Maintenance",
        }
    }

    /// Only active assets are moved and aged by the simulation.
    pub fn is_operating(&self) -> bool {
        matches!(self, AssetStatus::Active)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerType {
    National,
    Foreign,
}

/// Keys of the typed technical specification map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKey {
    /// Bollard pull in tonnes (tugs, AHTS)
    BollardPullTonnes,
    /// Deadweight in tonnes (tankers, supply vessels)
    DeadweightTonnes,
    /// Rated operating water depth in feet (offshore rigs)
    WaterDepthFt,
    /// Rated drawworks horsepower (onshore rigs)
    Horsepower,
    /// Rated drilling depth in feet
    DrillingDepthFt,
}

impl SpecKey {
    pub fn label(&self) -> &'static str {
        match self {
            SpecKey::BollardPullTonnes => "bollard pull",
            SpecKey::DeadweightTonnes => "deadweight",
            SpecKey::WaterDepthFt => "water depth rating",
            SpecKey::Horsepower => "horsepower rating",
            SpecKey::DrillingDepthFt => "drilling depth rating",
        }
    }
}

/// Category-specific technical data as a typed key/value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicalSpecs(BTreeMap<SpecKey, f64>);

impl TechnicalSpecs {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: SpecKey, value: f64) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn set(&mut self, key: SpecKey, value: f64) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: SpecKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    /// A spec counts as present only when it is a positive, finite number.
    pub fn has(&self, key: SpecKey) -> bool {
        self.get(key).is_some_and(|v| v.is_finite() && v > 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpecKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An inventory line owned by exactly one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparePart {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub min_level: u32,
    pub sku: String,
    pub last_updated: DateTime<Utc>,
}

impl SparePart {
    pub fn is_below_min(&self) -> bool {
        self.quantity < self.min_level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl WorkOrderStatus {
    /// The next status along `Open -> In Progress -> Completed`.
    /// `Completed` has no successor.
    pub fn next(&self) -> Option<WorkOrderStatus> {
        match self {
            WorkOrderStatus::Open => Some(WorkOrderStatus::InProgress),
            WorkOrderStatus::InProgress => Some(WorkOrderStatus::Completed),
            WorkOrderStatus::Completed => None,
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkOrderStatus::Open => "Open",
            WorkOrderStatus::InProgress => "In Progress",
            WorkOrderStatus::Completed => "Completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderPriority {
    Normal,
    High,
    Critical,
}

impl fmt::Display for WorkOrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkOrderPriority::Normal => "Normal",
            WorkOrderPriority::High => "High",
            WorkOrderPriority::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// A maintenance ticket (work order) owned by exactly one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    /// Set on tickets opened by work-order automation
    #[serde(default)]
    pub auto_generated: bool,
}

/// The central fleet entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    /// Human-readable registration code
    pub number: String,
    pub category: AssetCategory,
    pub sub_type: String,
    pub status: AssetStatus,

    pub coordinates: Coordinates,
    /// Past positions, newest first, at most `HISTORY_LIMIT`
    #[serde(default)]
    pub history: Vec<Coordinates>,
    #[serde(default)]
    pub current_zone_id: Option<String>,

    /// Health index in [0, 100]
    pub health: f64,
    #[serde(default)]
    pub incident_count: u32,
    #[serde(default)]
    pub days_since_incident: u32,
    #[serde(default)]
    pub csms_score: f64,
    /// Accumulated emissions in tonnes CO2
    #[serde(default)]
    pub total_emissions: f64,
    /// Instantaneous emission rate in tonnes CO2 per hour
    #[serde(default)]
    pub co2_emissions: f64,

    pub flag_country: String,
    pub owner_type: OwnerType,
    #[serde(default)]
    pub certification: String,
    #[serde(default)]
    pub capacity_string: String,
    #[serde(default)]
    pub specs: TechnicalSpecs,

    #[serde(default)]
    pub inventory: Vec<SparePart>,
    #[serde(default)]
    pub maintenance_log: Vec<MaintenanceRecord>,
    #[serde(default)]
    pub next_maintenance_date: Option<NaiveDate>,
}

impl Asset {
    /// Creates a freshly registered asset with full health and no records.
    pub fn new(
        id: impl Into<String>,
        number: impl Into<String>,
        category: AssetCategory,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            category,
            sub_type: String::new(),
            status: AssetStatus::Registered,
            coordinates,
            history: Vec::new(),
            current_zone_id: None,
            health: 100.0,
            incident_count: 0,
            days_since_incident: 0,
            csms_score: 0.0,
            total_emissions: 0.0,
            co2_emissions: 0.0,
            flag_country: String::new(),
            owner_type: OwnerType::National,
            certification: String::new(),
            capacity_string: String::new(),
            specs: TechnicalSpecs::new(),
            inventory: Vec::new(),
            maintenance_log: Vec::new(),
            next_maintenance_date: None,
        }
    }

    /// Moves the asset, pushing the previous position onto `history`.
    pub fn move_to(&mut self, next: Coordinates) {
        self.history.insert(0, self.coordinates);
        self.history.truncate(HISTORY_LIMIT);
        self.coordinates = next;
    }

    pub fn part(&self, part_id: &str) -> Option<&SparePart> {
        self.inventory.iter().find(|p| p.id == part_id)
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<&MaintenanceRecord> {
        self.maintenance_log.iter().find(|r| r.id == ticket_id)
    }

    /// Certification tokens, split on commas, slashes and whitespace.
    pub fn certification_tokens(&self) -> impl Iterator<Item = &str> {
        self.certification
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|t| !t.is_empty())
    }
}

/// A named circular geofence. Read-only during simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    /// Radius in meters
    pub radius: f64,
}

impl Zone {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinates: Coordinates,
        radius: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    InTransit,
    Received,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferItem {
    pub name: String,
    pub quantity: u32,
}

/// A logistics shipment moving between two sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub reference: String,
    pub origin: String,
    pub destination_name: String,
    pub destination: Coordinates,
    pub coordinates: Coordinates,
    pub status: TransferStatus,
    #[serde(default)]
    pub items: Vec<TransferItem>,
}

impl Transfer {
    pub fn is_moving(&self) -> bool {
        self.status != TransferStatus::Received
    }
}
