//! Initial fleet state supplied by the data provider.

use crate::error::SeedError;
use crate::model::{Asset, Transfer, Zone, HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Assets, zones and transfers the runtime starts from (and resets to).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSeed {
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl FleetSeed {
    /// Parses and validates a JSON seed.
    pub fn from_json_str(json: &str) -> Result<Self, SeedError> {
        let seed: FleetSeed = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Reads, parses and validates a JSON seed file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, SeedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks ids for uniqueness and records for the model invariants.
    pub fn validate(&self) -> Result<(), SeedError> {
        let mut asset_ids = HashSet::new();
        let mut ticket_ids = HashSet::new();
        for asset in &self.assets {
            if !asset_ids.insert(asset.id.as_str()) {
                return Err(SeedError::DuplicateId {
                    kind: "asset",
                    id: asset.id.clone(),
                });
            }
            if !asset.coordinates.is_finite() {
                return Err(SeedError::invalid("asset", &asset.id, "non-finite coordinates"));
            }
            if !(0.0..=100.0).contains(&asset.health) {
                return Err(SeedError::invalid(
                    "asset",
                    &asset.id,
                    format!("health {} outside [0, 100]", asset.health),
                ));
            }
            if asset.history.len() > HISTORY_LIMIT {
                return Err(SeedError::invalid(
                    "asset",
                    &asset.id,
                    format!("history holds {} positions, limit is {}", asset.history.len(), HISTORY_LIMIT),
                ));
            }
            for record in &asset.maintenance_log {
                if !ticket_ids.insert(record.id.as_str()) {
                    return Err(SeedError::DuplicateId {
                        kind: "work order",
                        id: record.id.clone(),
                    });
                }
            }
        }

        let mut zone_ids = HashSet::new();
        for zone in &self.zones {
            if !zone_ids.insert(zone.id.as_str()) {
                return Err(SeedError::DuplicateId {
                    kind: "zone",
                    id: zone.id.clone(),
                });
            }
            if !zone.coordinates.is_finite() || !zone.radius.is_finite() || zone.radius < 0.0 {
                return Err(SeedError::invalid("zone", &zone.id, "invalid center or radius"));
            }
        }

        let mut transfer_ids = HashSet::new();
        for transfer in &self.transfers {
            if !transfer_ids.insert(transfer.id.as_str()) {
                return Err(SeedError::DuplicateId {
                    kind: "transfer",
                    id: transfer.id.clone(),
                });
            }
            if !transfer.coordinates.is_finite() || !transfer.destination.is_finite() {
                return Err(SeedError::invalid("transfer", &transfer.id, "non-finite coordinates"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetCategory, Coordinates};

    const SEED_JSON: &str = r#"{
        "assets": [{
            "id": "V1",
            "number": "TB-ANOA-01",
            "category": "Vessel",
            "subType": "Anchor Handling Tug",
            "status": "Active",
            "coordinates": { "lat": -1.27, "lng": 116.81 },
            "health": 92.5,
            "co2Emissions": 1.8,
            "flagCountry": "Indonesia",
            "ownerType": "National",
            "certification": "BKI",
            "specs": { "bollard_pull_tonnes": 60.0 }
        }],
        "zones": [{
            "id": "Z-PORT",
            "name": "Semayang Port Basin",
            "coordinates": { "lat": -1.27, "lng": 116.81 },
            "radius": 3000.0
        }]
    }"#;

    #[test]
    fn test_parse_seed_json() {
        let seed = FleetSeed::from_json_str(SEED_JSON).unwrap();

        assert_eq!(seed.assets.len(), 1);
        assert_eq!(seed.assets[0].category, AssetCategory::Vessel);
        assert!(seed.assets[0].history.is_empty());
        assert_eq!(seed.zones[0].radius, 3000.0);
        assert!(seed.transfers.is_empty());
    }

    #[test]
    fn test_duplicate_asset_rejected() {
        let mut seed = FleetSeed::from_json_str(SEED_JSON).unwrap();
        seed.assets.push(seed.assets[0].clone());

        assert!(matches!(
            seed.validate(),
            Err(SeedError::DuplicateId { kind: "asset", .. })
        ));
    }

    #[test]
    fn test_invalid_zone_rejected() {
        let mut seed = FleetSeed::from_json_str(SEED_JSON).unwrap();
        seed.zones[0].radius = -5.0;
        assert!(matches!(seed.validate(), Err(SeedError::InvalidRecord { kind: "zone", .. })));
    }

    #[test]
    fn test_out_of_range_health_rejected() {
        let mut seed = FleetSeed::from_json_str(SEED_JSON).unwrap();
        seed.assets[0].health = 120.0;
        assert!(seed.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(FleetSeed::from_json_str("{ nope"), Err(SeedError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_positions() {
        let mut seed = FleetSeed::from_json_str(SEED_JSON).unwrap();
        seed.assets[0].move_to(Coordinates::new(-1.0, 117.0));

        let json = seed.to_json_pretty().unwrap();
        let back = FleetSeed::from_json_str(&json).unwrap();
        assert_eq!(back, seed);
    }
}
