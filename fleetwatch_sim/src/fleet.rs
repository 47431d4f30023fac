//! Built-in demo fleet.
//!
//! A small East Kalimantan operation: supply vessels out of Balikpapan, an
//! offshore block in the Mahakam delta and an onshore field at Sanga-Sanga.
//! Every scenario starts from this seed unless a seed file is given.

use chrono::{DateTime, Utc};
use fleetwatch_core::{
    Asset, AssetCategory, AssetStatus, Coordinates, FleetSeed, OwnerType, SparePart, SpecKey,
    TechnicalSpecs, Transfer, TransferItem, TransferStatus, Zone,
};
use std::time::{Duration, UNIX_EPOCH};

/// Stock timestamps in the demo fleet (2024-01-01 00:00 UTC).
fn stocked_at() -> DateTime<Utc> {
    DateTime::<Utc>::from(UNIX_EPOCH + Duration::from_secs(1704067200))
}

/// A spare part entry as carried on board.
pub fn spare_part(id: &str, name: &str, quantity: u32, unit: &str, min_level: u32, sku: &str) -> SparePart {
    SparePart {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        min_level,
        sku: sku.to_string(),
        last_updated: stocked_at(),
    }
}

struct AssetSpec<'a> {
    id: &'a str,
    number: &'a str,
    category: AssetCategory,
    sub_type: &'a str,
    status: AssetStatus,
    position: (f64, f64),
    health: f64,
    co2_rate: f64,
    flag: &'a str,
    owner: OwnerType,
    certification: &'a str,
}

fn build(spec: AssetSpec<'_>, specs: TechnicalSpecs, inventory: Vec<SparePart>) -> Asset {
    let mut asset = Asset::new(
        spec.id,
        spec.number,
        spec.category,
        Coordinates::new(spec.position.0, spec.position.1),
    );
    asset.sub_type = spec.sub_type.to_string();
    asset.status = spec.status;
    asset.health = spec.health;
    asset.co2_emissions = spec.co2_rate;
    asset.flag_country = spec.flag.to_string();
    asset.owner_type = spec.owner;
    asset.certification = spec.certification.to_string();
    asset.capacity_string = specs
        .iter()
        .map(|(key, value)| format!("{}: {}", key.label(), value))
        .collect::<Vec<_>>()
        .join(", ");
    asset.specs = specs;
    asset.inventory = inventory;
    asset.csms_score = 85.0;
    asset
}

pub fn demo_assets() -> Vec<Asset> {
    vec![
        build(
            AssetSpec {
                id: "V-001",
                number: "TB-ANOA-01",
                category: AssetCategory::Vessel,
                sub_type: "Anchor Handling Tug",
                status: AssetStatus::Active,
                position: (-1.2654, 116.8312),
                health: 92.0,
                co2_rate: 1.8,
                flag: "Indonesia",
                owner: OwnerType::National,
                certification: "BKI",
            },
            TechnicalSpecs::new().with(SpecKey::BollardPullTonnes, 60.0),
            vec![
                spare_part("P-V001-FF", "Main Engine Fuel Filter", 4, "pcs", 2, "MEFF-3306"),
                spare_part("P-V001-OS", "Oil Separator Element", 2, "pcs", 1, "OSE-200"),
            ],
        ),
        build(
            AssetSpec {
                id: "V-002",
                number: "AHTS-PERKASA",
                category: AssetCategory::Vessel,
                sub_type: "Anchor Handling Tug Supply",
                status: AssetStatus::Active,
                position: (-1.05, 117.35),
                health: 78.0,
                co2_rate: 2.4,
                flag: "Indonesia",
                owner: OwnerType::Foreign,
                certification: "BKI, ABS",
            },
            TechnicalSpecs::new()
                .with(SpecKey::BollardPullTonnes, 80.0)
                .with(SpecKey::DeadweightTonnes, 2500.0),
            vec![spare_part("P-V002-FF", "Main Engine Fuel Filter", 1, "pcs", 2, "MEFF-3512")],
        ),
        build(
            AssetSpec {
                id: "V-003",
                number: "PSV-NUSANTARA",
                category: AssetCategory::Vessel,
                sub_type: "Platform Supply Vessel",
                status: AssetStatus::Active,
                position: (-0.95, 117.55),
                health: 64.0,
                co2_rate: 2.1,
                flag: "Singapore",
                owner: OwnerType::Foreign,
                certification: "DNV",
            },
            TechnicalSpecs::new().with(SpecKey::DeadweightTonnes, 3200.0),
            Vec::new(),
        ),
        build(
            AssetSpec {
                id: "R-001",
                number: "OR-MAHAKAM-01",
                category: AssetCategory::OffshoreRig,
                sub_type: "Jack-up",
                status: AssetStatus::Active,
                position: (-0.85, 117.65),
                health: 85.0,
                co2_rate: 4.5,
                flag: "Indonesia",
                owner: OwnerType::National,
                certification: "BKI, API",
            },
            TechnicalSpecs::new()
                .with(SpecKey::WaterDepthFt, 350.0)
                .with(SpecKey::DrillingDepthFt, 25000.0),
            vec![spare_part("P-R001-BOP", "BOP Seal Kit", 2, "kit", 1, "BOP-SK-135")],
        ),
        build(
            AssetSpec {
                id: "R-002",
                number: "LR-1500-07",
                category: AssetCategory::OnshoreRig,
                sub_type: "Land Rig",
                status: AssetStatus::Active,
                position: (-0.52, 117.12),
                health: 58.0,
                co2_rate: 1.2,
                flag: "Indonesia",
                owner: OwnerType::National,
                certification: "API",
            },
            TechnicalSpecs::new().with(SpecKey::Horsepower, 1500.0),
            vec![spare_part("P-R002-HVS", "Hydraulic Valve Set", 1, "set", 1, "HVS-5K")],
        ),
        build(
            AssetSpec {
                id: "V-004",
                number: "TB-KASUARI",
                category: AssetCategory::Vessel,
                sub_type: "Harbour Tug",
                status: AssetStatus::CatalogFilling,
                position: (-1.27, 116.80),
                health: 100.0,
                co2_rate: 0.9,
                flag: "Indonesia",
                owner: OwnerType::National,
                certification: "Pending",
            },
            TechnicalSpecs::new(),
            Vec::new(),
        ),
        build(
            AssetSpec {
                id: "R-003",
                number: "OR-ATTAKA-02",
                category: AssetCategory::OffshoreRig,
                sub_type: "Semi-submersible",
                status: AssetStatus::Maintenance,
                position: (-0.30, 117.80),
                health: 71.0,
                co2_rate: 5.0,
                flag: "Panama",
                owner: OwnerType::Foreign,
                certification: "ABS",
            },
            TechnicalSpecs::new().with(SpecKey::WaterDepthFt, 1200.0),
            vec![spare_part("P-R003-BOP", "BOP Seal Kit", 0, "kit", 1, "BOP-SK-183")],
        ),
    ]
}

pub fn demo_zones() -> Vec<Zone> {
    vec![
        Zone::new("Z-BPN", "Balikpapan Port Anchorage", Coordinates::new(-1.2654, 116.8312), 5_000.0),
        Zone::new("Z-MHK", "Mahakam Offshore Block", Coordinates::new(-0.85, 117.65), 15_000.0),
        Zone::new("Z-SNG", "Sanga-Sanga Field", Coordinates::new(-0.52, 117.12), 8_000.0),
        Zone::new("Z-BTG", "Bontang LNG Terminal", Coordinates::new(0.0917, 117.4889), 4_000.0),
    ]
}

pub fn demo_transfers() -> Vec<Transfer> {
    let base = Coordinates::new(-1.2470, 116.8940);
    vec![
        Transfer {
            id: "T-001".to_string(),
            reference: "TRF-2024-001".to_string(),
            origin: "Balikpapan Logistics Base".to_string(),
            destination_name: "Mahakam Offshore Block".to_string(),
            destination: Coordinates::new(-0.85, 117.65),
            coordinates: base,
            status: TransferStatus::InTransit,
            items: vec![
                TransferItem {
                    name: "BOP Seal Kit".to_string(),
                    quantity: 2,
                },
                TransferItem {
                    name: "Drill Pipe 5in".to_string(),
                    quantity: 40,
                },
            ],
        },
        Transfer {
            id: "T-002".to_string(),
            reference: "TRF-2024-002".to_string(),
            origin: "Balikpapan Logistics Base".to_string(),
            destination_name: "Sanga-Sanga Field".to_string(),
            destination: Coordinates::new(-0.52, 117.12),
            coordinates: base,
            status: TransferStatus::Pending,
            items: vec![TransferItem {
                name: "Hydraulic Valve Set".to_string(),
                quantity: 3,
            }],
        },
        Transfer {
            id: "T-003".to_string(),
            reference: "TRF-2023-118".to_string(),
            origin: "Samarinda Warehouse".to_string(),
            destination_name: "Bontang LNG Terminal".to_string(),
            destination: Coordinates::new(0.0917, 117.4889),
            coordinates: Coordinates::new(0.0917, 117.4889),
            status: TransferStatus::Received,
            items: Vec::new(),
        },
    ]
}

/// The complete demo seed.
pub fn demo_seed() -> FleetSeed {
    FleetSeed {
        assets: demo_assets(),
        zones: demo_zones(),
        transfers: demo_transfers(),
    }
}

/// A `rows x cols` grid of small zones around `center`, `spacing_deg` apart.
pub fn zone_grid(center: Coordinates, rows: usize, cols: usize, spacing_deg: f64, radius_m: f64) -> Vec<Zone> {
    let mut zones = Vec::with_capacity(rows * cols);
    let row_offset = (rows as f64 - 1.0) / 2.0;
    let col_offset = (cols as f64 - 1.0) / 2.0;
    for r in 0..rows {
        for c in 0..cols {
            let position = center.offset(
                (r as f64 - row_offset) * spacing_deg,
                (c as f64 - col_offset) * spacing_deg,
            );
            zones.push(Zone::new(
                format!("Z-{:02}-{:02}", r, c),
                format!("Sector {}{}", (b'A' + (r % 26) as u8) as char, c + 1),
                position,
                radius_m,
            ));
        }
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_core::{calculate_cabotage_priority, validate_asset_readiness, CabotagePriority};

    #[test]
    fn test_demo_seed_is_valid() {
        let seed = demo_seed();
        seed.validate().unwrap();
        assert_eq!(seed.assets.len(), 7);
        assert_eq!(seed.zones.len(), 4);
    }

    #[test]
    fn test_demo_fleet_compliance_mix() {
        let assets = demo_assets();
        let by_id = |id: &str| assets.iter().find(|a| a.id == id).unwrap();

        assert!(validate_asset_readiness(by_id("V-001")).is_ok());
        assert!(validate_asset_readiness(by_id("V-004")).is_err());
        assert_eq!(calculate_cabotage_priority(by_id("V-001")), CabotagePriority::Priority1);
        assert_eq!(calculate_cabotage_priority(by_id("V-002")), CabotagePriority::Priority2);
        assert_eq!(calculate_cabotage_priority(by_id("V-003")), CabotagePriority::Priority3);
    }

    #[test]
    fn test_zone_grid_layout() {
        let zones = zone_grid(Coordinates::new(-1.0, 117.0), 3, 4, 0.02, 1_000.0);
        assert_eq!(zones.len(), 12);
        assert_eq!(zones[0].id, "Z-00-00");
        assert_eq!(zones[11].name, "Sector C4");

        let ids: std::collections::HashSet<_> = zones.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_demo_seed_json_round_trip() {
        let seed = demo_seed();
        let json = seed.to_json_pretty().unwrap();
        assert_eq!(FleetSeed::from_json_str(&json).unwrap(), seed);
    }
}
