//! Spare part stock movements.

use crate::model::{Asset, SparePart};
use chrono::{DateTime, Utc};

/// Takes one unit out of stock. A part at zero is a stockout: the
/// quantity is left untouched and `false` is returned.
pub fn take_one(part: &mut SparePart, now: DateTime<Utc>) -> bool {
    match part.quantity.checked_sub(1) {
        Some(remaining) => {
            part.quantity = remaining;
            part.last_updated = now;
            true
        }
        None => false,
    }
}

/// Finds a part by name (case-insensitive). When several lines carry the
/// name, the first one with stock wins; an all-empty match returns the first.
pub fn find_by_name_mut<'a>(asset: &'a mut Asset, name: &str) -> Option<&'a mut SparePart> {
    let matches = |p: &SparePart| p.name.eq_ignore_ascii_case(name);
    let idx = asset
        .inventory
        .iter()
        .position(|p| matches(p) && p.quantity > 0)
        .or_else(|| asset.inventory.iter().position(|p| matches(p)))?;
    asset.inventory.get_mut(idx)
}

/// Parts currently under their minimum stock level.
pub fn low_stock(asset: &Asset) -> impl Iterator<Item = &SparePart> {
    asset.inventory.iter().filter(|p| p.is_below_min())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetCategory, Coordinates};
    use chrono::TimeZone;

    fn part(quantity: u32) -> SparePart {
        SparePart {
            id: "P1".to_string(),
            name: "Hydraulic Valve Set".to_string(),
            quantity,
            unit: "set".to_string(),
            min_level: 2,
            sku: "HVS-01".to_string(),
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_take_one_decrements_and_stamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut p = part(2);

        assert!(take_one(&mut p, now));
        assert_eq!(p.quantity, 1);
        assert_eq!(p.last_updated, now);
    }

    #[test]
    fn test_take_one_refuses_at_zero() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut p = part(0);
        let before = p.clone();

        assert!(!take_one(&mut p, now));
        assert_eq!(p, before);
    }

    #[test]
    fn test_find_by_name_and_low_stock() {
        let mut asset = Asset::new("R1", "LR-1", AssetCategory::OnshoreRig, Coordinates::new(0.0, 0.0));
        asset.inventory.push(part(1));

        assert!(find_by_name_mut(&mut asset, "hydraulic valve set").is_some());
        assert!(find_by_name_mut(&mut asset, "BOP Seal Kit").is_none());
        assert_eq!(low_stock(&asset).count(), 1);
    }

    #[test]
    fn test_find_by_name_skips_empty_lines() {
        let mut asset = Asset::new("R1", "LR-1", AssetCategory::OnshoreRig, Coordinates::new(0.0, 0.0));
        let mut empty = part(0);
        empty.id = "P0".to_string();
        asset.inventory.push(empty);
        asset.inventory.push(part(3));

        let found = find_by_name_mut(&mut asset, "Hydraulic Valve Set").unwrap();
        assert_eq!(found.id, "P1");
        assert_eq!(found.quantity, 3);

        asset.inventory[1].quantity = 0;
        let found = find_by_name_mut(&mut asset, "Hydraulic Valve Set").unwrap();
        assert_eq!(found.id, "P0");
    }
}
