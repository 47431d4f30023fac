//! Geofence detection - which circular zone contains an asset.
//!
//! Zones are pre-bucketed by H3 cell so each lookup only runs the exact
//! haversine test against zones whose footprint can reach the position's
//! cell. The indexed lookup always agrees with the linear rule in
//! [`detect_zone`].
//!
//! # Overlapping zones
//!
//! When a position lies inside several zones, the zone with the smallest
//! radius wins, ties broken by zone id. The most specific fence is the one
//! operators care about (a port basin inside an anchorage area).

use crate::geo::distance_meters;
use crate::model::{Coordinates, Zone};
use h3o::{CellIndex, LatLng, Resolution};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Zones wider than this many grid rings are checked linearly instead.
const MAX_INDEX_RINGS: u32 = 96;

/// Returns true if the position lies inside the zone (boundary inclusive).
pub fn contains(zone: &Zone, position: &Coordinates) -> bool {
    distance_meters(position, &zone.coordinates) <= zone.radius
}

fn more_specific(a: &Zone, b: &Zone) -> Ordering {
    a.radius
        .partial_cmp(&b.radius)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

/// Finds the zone containing `position`, if any.
pub fn detect_zone<'a>(position: &Coordinates, zones: &'a [Zone]) -> Option<&'a Zone> {
    zones
        .iter()
        .filter(|zone| contains(zone, position))
        .min_by(|a, b| more_specific(a, b))
}

/// Result of comparing the detected zone with the asset's recorded zone.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneChange<'a> {
    /// Still in the same zone, or still outside every zone
    Unchanged,
    /// Newly inside this zone (fires the entry notification)
    Entered(&'a Zone),
    /// Left the recorded zone and is now outside every zone
    Left(String),
}

/// Compares the previous zone id with the newly detected zone.
pub fn zone_change<'a>(previous: Option<&str>, detected: Option<&'a Zone>) -> ZoneChange<'a> {
    match (previous, detected) {
        (Some(prev), Some(zone)) if prev == zone.id => ZoneChange::Unchanged,
        (_, Some(zone)) => ZoneChange::Entered(zone),
        (Some(prev), None) => ZoneChange::Left(prev.to_string()),
        (None, None) => ZoneChange::Unchanged,
    }
}

/// Spatial index over an immutable zone set.
#[derive(Debug, Clone)]
pub struct ZoneIndex {
    zones: Vec<Zone>,

    /// H3 resolution used for bucketing
    resolution: Resolution,

    /// H3 cell -> indices of zones whose disk covers that cell
    cells: HashMap<CellIndex, Vec<usize>>,

    /// Zones that could not be indexed (invalid center, huge radius)
    unindexed: Vec<usize>,
}

impl ZoneIndex {
    /// Builds an index at the default resolution (7, ~1.4 km edges).
    pub fn new(zones: Vec<Zone>) -> Self {
        Self::with_resolution(zones, Resolution::Seven)
    }

    pub fn with_resolution(zones: Vec<Zone>, resolution: Resolution) -> Self {
        let edge_m = resolution.edge_length_m();
        let mut cells: HashMap<CellIndex, Vec<usize>> = HashMap::new();
        let mut unindexed = Vec::new();

        for (i, zone) in zones.iter().enumerate() {
            let center = LatLng::new(zone.coordinates.lat, zone.coordinates.lng);
            let rings = ring_count(zone.radius, edge_m);

            match (center, rings) {
                (Ok(center), Some(k)) => {
                    let disk: Vec<CellIndex> = center.to_cell(resolution).grid_disk(k);
                    for cell in disk {
                        cells.entry(cell).or_default().push(i);
                    }
                }
                _ => unindexed.push(i),
            }
        }

        Self {
            zones,
            resolution,
            cells,
            unindexed,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn get(&self, zone_id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == zone_id)
    }

    /// Finds the zone containing `position` using the cell buckets.
    pub fn detect(&self, position: &Coordinates) -> Option<&Zone> {
        let cell = match LatLng::new(position.lat, position.lng) {
            Ok(ll) => ll.to_cell(self.resolution),
            Err(_) => return detect_zone(position, &self.zones),
        };

        self.cells
            .get(&cell)
            .into_iter()
            .flatten()
            .chain(self.unindexed.iter())
            .map(|&i| &self.zones[i])
            .filter(|zone| contains(zone, position))
            .min_by(|a, b| more_specific(a, b))
    }
}

/// Number of grid rings that safely covers a circle of `radius` meters.
///
/// Cell sizes vary across the globe, so the average edge length is halved
/// and two extra rings are added.
fn ring_count(radius: f64, edge_m: f64) -> Option<u32> {
    if !radius.is_finite() || radius < 0.0 {
        return None;
    }
    let k = (2.0 * radius / edge_m).ceil() + 2.0;
    if k > MAX_INDEX_RINGS as f64 {
        None
    } else {
        Some(k as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zones() -> Vec<Zone> {
        vec![
            Zone::new("Z-ANCHOR", "Balikpapan Anchorage", Coordinates::new(-1.30, 116.80), 20_000.0),
            Zone::new("Z-PORT", "Semayang Port Basin", Coordinates::new(-1.27, 116.81), 3_000.0),
            Zone::new("Z-FIELD", "Mahakam Block", Coordinates::new(-0.80, 117.40), 15_000.0),
        ]
    }

    #[test]
    fn test_detect_inside_single_zone() {
        let zones = zones();
        let hit = detect_zone(&Coordinates::new(-0.80, 117.40), &zones).unwrap();
        assert_eq!(hit.id, "Z-FIELD");
    }

    #[test]
    fn test_detect_outside_all_zones() {
        let zones = zones();
        assert!(detect_zone(&Coordinates::new(5.0, 100.0), &zones).is_none());
    }

    #[test]
    fn test_overlap_prefers_smallest_radius() {
        let zones = zones();
        // Inside both the anchorage and the port basin
        let hit = detect_zone(&Coordinates::new(-1.27, 116.81), &zones).unwrap();
        assert_eq!(hit.id, "Z-PORT");
    }

    #[test]
    fn test_overlap_equal_radius_breaks_tie_by_id() {
        let zones = vec![
            Zone::new("Z-B", "B", Coordinates::new(0.0, 0.0), 1_000.0),
            Zone::new("Z-A", "A", Coordinates::new(0.0, 0.0), 1_000.0),
        ];
        let hit = detect_zone(&Coordinates::new(0.0, 0.0), &zones).unwrap();
        assert_eq!(hit.id, "Z-A");
    }

    #[test]
    fn test_boundary_is_inside() {
        let center = Coordinates::new(0.0, 0.0);
        let edge = Coordinates::new(0.0, 0.01);
        let zone = Zone::new("Z", "Edge", center, distance_meters(&edge, &center));
        assert!(contains(&zone, &edge));
    }

    #[test]
    fn test_zone_change_transitions() {
        let zones = zones();
        let field = &zones[2];

        assert_eq!(zone_change(None, None), ZoneChange::Unchanged);
        assert_eq!(zone_change(None, Some(field)), ZoneChange::Entered(field));
        assert_eq!(zone_change(Some("Z-FIELD"), Some(field)), ZoneChange::Unchanged);
        assert_eq!(zone_change(Some("Z-PORT"), Some(field)), ZoneChange::Entered(field));
        assert_eq!(zone_change(Some("Z-FIELD"), None), ZoneChange::Left("Z-FIELD".to_string()));
    }

    #[test]
    fn test_index_handles_huge_and_invalid_zones() {
        let zones = vec![
            Zone::new("Z-HUGE", "Java Sea", Coordinates::new(-5.0, 110.0), 900_000.0),
            Zone::new("Z-BAD", "Broken", Coordinates::new(f64::NAN, 0.0), 1_000.0),
        ];
        let index = ZoneIndex::new(zones);

        let hit = index.detect(&Coordinates::new(-4.0, 112.0)).unwrap();
        assert_eq!(hit.id, "Z-HUGE");
        assert!(index.detect(&Coordinates::new(40.0, 10.0)).is_none());
    }

    #[test]
    fn test_index_lookup_by_id() {
        let index = ZoneIndex::new(zones());
        assert_eq!(index.get("Z-PORT").unwrap().name, "Semayang Port Basin");
        assert!(index.get("Z-NONE").is_none());
    }

    proptest! {
        #[test]
        fn prop_index_agrees_with_linear_scan(
            lat in -1.6f64..-0.5,
            lng in 116.5f64..117.7,
        ) {
            let zones = zones();
            let index = ZoneIndex::new(zones.clone());
            let position = Coordinates::new(lat, lng);

            let linear = detect_zone(&position, &zones).map(|z| z.id.clone());
            let indexed = index.detect(&position).map(|z| z.id.clone());
            prop_assert_eq!(linear, indexed);
        }
    }
}
