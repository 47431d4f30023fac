//! Error types for the fleet runtime.

use crate::compliance::ComplianceError;
use fleetwatch_env::EnvError;
use thiserror::Error;

/// Errors returned by user-triggered fleet actions.
///
/// Every variant is recoverable: the action that produced it has not
/// modified any state.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Work order not found: {0}")]
    TicketNotFound(String),

    #[error("Part {part_id} not found on asset {asset_id}")]
    PartNotFound { asset_id: String, part_id: String },

    #[error("Transfer not found: {0}")]
    TransferNotFound(String),

    #[error("Stockout: no {part} left on asset {asset_id}")]
    Stockout { asset_id: String, part: String },

    #[error("Readiness check failed: {0}")]
    Compliance(#[from] ComplianceError),

    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
}

/// Errors raised while loading or validating a fleet seed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Invalid {kind} {id}: {reason}")]
    InvalidRecord {
        kind: &'static str,
        id: String,
        reason: String,
    },
}

impl SeedError {
    pub fn invalid(kind: &'static str, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }
}
