//! Compliance gate for lifecycle submissions and cabotage classification.

use crate::model::{Asset, AssetCategory, OwnerType, SpecKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Flag state that cabotage rules apply to.
pub const CABOTAGE_FLAG: &str = "Indonesia";

/// Classification society required for vessels under the cabotage flag.
pub const CLASS_SOCIETY_TOKEN: &str = "BKI";

const PENDING_TOKEN: &str = "Pending";

/// Reasons an asset is not ready for verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceError {
    #[error("{category} {number} is missing technical data: {requirement}")]
    MissingSpecification {
        category: AssetCategory,
        number: String,
        requirement: String,
    },

    #[error("{number} has no certification on record")]
    MissingCertification { number: String },

    #[error("{number} certification is still pending")]
    CertificationPending { number: String },

    #[error("{number} is flagged {flag} and requires {society} classification")]
    MissingClassification {
        number: String,
        flag: String,
        society: &'static str,
    },
}

/// Category rule: at least one of these specs must be present.
fn required_specs(category: AssetCategory) -> &'static [SpecKey] {
    match category {
        AssetCategory::Vessel => &[SpecKey::BollardPullTonnes, SpecKey::DeadweightTonnes],
        AssetCategory::OffshoreRig => &[SpecKey::WaterDepthFt],
        AssetCategory::OnshoreRig => &[SpecKey::Horsepower],
    }
}

fn is_cabotage_flag(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case(CABOTAGE_FLAG)
}

/// Checks the category-specific mandatory data of an asset.
///
/// Pure: the asset is never modified, whatever the outcome.
pub fn validate_asset_readiness(asset: &Asset) -> Result<(), ComplianceError> {
    let required = required_specs(asset.category);
    if !required.iter().any(|key| asset.specs.has(*key)) {
        let requirement = required
            .iter()
            .map(|key| key.label())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(ComplianceError::MissingSpecification {
            category: asset.category,
            number: asset.number.clone(),
            requirement,
        });
    }

    let tokens: Vec<&str> = asset.certification_tokens().collect();
    if tokens.is_empty() {
        return Err(ComplianceError::MissingCertification {
            number: asset.number.clone(),
        });
    }
    if tokens.iter().any(|t| t.eq_ignore_ascii_case(PENDING_TOKEN)) {
        return Err(ComplianceError::CertificationPending {
            number: asset.number.clone(),
        });
    }

    if asset.category == AssetCategory::Vessel
        && is_cabotage_flag(&asset.flag_country)
        && !tokens.iter().any(|t| t.eq_ignore_ascii_case(CLASS_SOCIETY_TOKEN))
    {
        return Err(ComplianceError::MissingClassification {
            number: asset.number.clone(),
            flag: asset.flag_country.clone(),
            society: CLASS_SOCIETY_TOKEN,
        });
    }

    Ok(())
}

/// Procurement preference tier derived from flag and ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CabotagePriority {
    #[serde(rename = "PRIORITY_1")]
    Priority1,
    #[serde(rename = "PRIORITY_2")]
    Priority2,
    #[serde(rename = "PRIORITY_3")]
    Priority3,
}

impl fmt::Display for CabotagePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CabotagePriority::Priority1 => "PRIORITY_1",
            CabotagePriority::Priority2 => "PRIORITY_2",
            CabotagePriority::Priority3 => "PRIORITY_3",
        };
        f.write_str(s)
    }
}

pub fn calculate_cabotage_priority(asset: &Asset) -> CabotagePriority {
    match (is_cabotage_flag(&asset.flag_country), asset.owner_type) {
        (true, OwnerType::National) => CabotagePriority::Priority1,
        (true, OwnerType::Foreign) => CabotagePriority::Priority2,
        (false, _) => CabotagePriority::Priority3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, TechnicalSpecs};

    fn vessel() -> Asset {
        let mut asset = Asset::new("V1", "TB-ANOA-01", AssetCategory::Vessel, Coordinates::new(-1.2, 116.8));
        asset.flag_country = "Indonesia".to_string();
        asset.certification = "BKI".to_string();
        asset.specs = TechnicalSpecs::new().with(SpecKey::BollardPullTonnes, 60.0);
        asset
    }

    #[test]
    fn test_ready_vessel_passes() {
        assert_eq!(validate_asset_readiness(&vessel()), Ok(()));
    }

    #[test]
    fn test_vessel_needs_bollard_pull_or_deadweight() {
        let mut asset = vessel();
        asset.specs = TechnicalSpecs::new();

        let err = validate_asset_readiness(&asset).unwrap_err();
        assert!(matches!(err, ComplianceError::MissingSpecification { .. }));
        assert_eq!(
            err.to_string(),
            "Vessel TB-ANOA-01 is missing technical data: bollard pull or deadweight"
        );

        asset.specs.set(SpecKey::DeadweightTonnes, 4500.0);
        assert!(validate_asset_readiness(&asset).is_ok());
    }

    #[test]
    fn test_rig_requirements() {
        let mut offshore = Asset::new("R1", "JU-300", AssetCategory::OffshoreRig, Coordinates::new(0.0, 0.0));
        offshore.certification = "ABS".to_string();
        assert!(validate_asset_readiness(&offshore).is_err());
        offshore.specs.set(SpecKey::WaterDepthFt, 350.0);
        assert!(validate_asset_readiness(&offshore).is_ok());

        let mut onshore = Asset::new("R2", "LR-1500", AssetCategory::OnshoreRig, Coordinates::new(0.0, 0.0));
        onshore.certification = "MIGAS".to_string();
        onshore.specs.set(SpecKey::WaterDepthFt, 350.0);
        assert!(validate_asset_readiness(&onshore).is_err());
        onshore.specs.set(SpecKey::Horsepower, 1500.0);
        assert!(validate_asset_readiness(&onshore).is_ok());
    }

    #[test]
    fn test_pending_certification_blocks() {
        let mut asset = vessel();
        asset.certification = "BKI, Pending".to_string();
        assert!(matches!(
            validate_asset_readiness(&asset),
            Err(ComplianceError::CertificationPending { .. })
        ));

        asset.certification = "  ".to_string();
        assert!(matches!(
            validate_asset_readiness(&asset),
            Err(ComplianceError::MissingCertification { .. })
        ));
    }

    #[test]
    fn test_national_flag_vessel_needs_bki() {
        let mut asset = vessel();
        asset.certification = "ABS".to_string();
        assert!(matches!(
            validate_asset_readiness(&asset),
            Err(ComplianceError::MissingClassification { .. })
        ));

        asset.flag_country = "Panama".to_string();
        assert!(validate_asset_readiness(&asset).is_ok());
    }

    #[test]
    fn test_cabotage_priority_tiers() {
        let mut asset = vessel();
        asset.owner_type = OwnerType::National;
        assert_eq!(calculate_cabotage_priority(&asset), CabotagePriority::Priority1);

        asset.owner_type = OwnerType::Foreign;
        assert_eq!(calculate_cabotage_priority(&asset), CabotagePriority::Priority2);

        asset.flag_country = "Singapore".to_string();
        assert_eq!(calculate_cabotage_priority(&asset), CabotagePriority::Priority3);
        asset.owner_type = OwnerType::National;
        assert_eq!(calculate_cabotage_priority(&asset), CabotagePriority::Priority3);
    }

    #[test]
    fn test_cabotage_priority_display() {
        assert_eq!(CabotagePriority::Priority1.to_string(), "PRIORITY_1");
    }
}
