//! Fleetwatch Core - fleet simulation, geofencing and maintenance automation
//!
//! The crate models a fleet of vessels and drilling rigs and evolves it tick
//! by tick:
//! 1. **Movement**: positional jitter, bounded position history and zone entry detection
//! 2. **Wear**: health jitter/drift and emissions accrual
//! 3. **Automation**: low-health assets get a work order, a reserved part and downtime
//!
//! User actions (lifecycle transitions, ticket progress, inventory use) and
//! ticks all go through [`FleetRuntime`]. Time and randomness come from a
//! [`fleetwatch_env::FleetContext`], so a run is reproducible from its seed.

pub mod compliance;
pub mod error;
pub mod geo;
pub mod geofence;
pub mod inventory;
pub mod lifecycle;
pub mod model;
pub mod notifications;
pub mod runtime;
pub mod seed;
pub mod service;
pub mod simulation;
pub mod work_order;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for convenience
pub use compliance::{calculate_cabotage_priority, validate_asset_readiness, CabotagePriority, ComplianceError};
pub use error::{FleetError, SeedError};
pub use geo::distance_meters;
pub use geofence::{detect_zone, ZoneIndex};
pub use lifecycle::{next_lifecycle_state, LifecycleAction, TransitionOutcome};
pub use model::{
    Asset, AssetCategory, AssetStatus, Coordinates, MaintenanceRecord, OwnerType, SparePart, SpecKey,
    TechnicalSpecs, Transfer, TransferItem, TransferStatus, WorkOrderPriority, WorkOrderStatus, Zone,
};
pub use notifications::{Notification, NotificationDraft, NotificationKind, NotificationLog};
pub use runtime::{FleetRuntime, FleetSnapshot, RuntimeConfig, TicketProgress, TickReport, TransferTickReport};
pub use seed::FleetSeed;
pub use service::FleetService;
pub use simulation::{SimulationConfig, SimulationEngine, SimulationError, ZONE_ENTRY_TITLE};
pub use work_order::{run_automation, AutomationOutcome};
