//! Fleet scenarios for deterministic simulation runs.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// FW-001: Demo fleet under normal operation, invariant sweep
    Patrol,

    /// FW-002: Steady health decay until every active asset is ticketed
    Degradation,

    /// FW-003: Critical parts exhausted before the health drop
    Stockout,

    /// FW-004: A fast vessel random-walking across a zone grid
    ZoneCrossing,

    /// FW-005: Pause freezes the fleet, resume continues without catch-up
    PauseResume,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Patrol,
            ScenarioId::Degradation,
            ScenarioId::Stockout,
            ScenarioId::ZoneCrossing,
            ScenarioId::PauseResume,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Patrol => "patrol",
            ScenarioId::Degradation => "degradation",
            ScenarioId::Stockout => "stockout",
            ScenarioId::ZoneCrossing => "zone_crossing",
            ScenarioId::PauseResume => "pause_resume",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Patrol => "Demo fleet ticking normally; health, history, emissions and zone invariants",
            ScenarioId::Degradation => "Health drifts down; one automatic work order per asset, then restore",
            ScenarioId::Stockout => "No critical parts on board; Critical tickets and untouched inventory",
            ScenarioId::ZoneCrossing => "Vessel crossing a grid of zones; one entry notification per zone change",
            ScenarioId::PauseResume => "Paused ticks mutate nothing; resume and reset behave",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patrol" | "fw-001" => Ok(ScenarioId::Patrol),
            "degradation" | "fw-002" => Ok(ScenarioId::Degradation),
            "stockout" | "fw-003" => Ok(ScenarioId::Stockout),
            "zone_crossing" | "zonecrossing" | "fw-004" => Ok(ScenarioId::ZoneCrossing),
            "pause_resume" | "pauseresume" | "fw-005" => Ok(ScenarioId::PauseResume),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
            assert!(!scenario.description().is_empty());
        }
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!("FW-004".parse::<ScenarioId>().unwrap(), ScenarioId::ZoneCrossing);
        assert_eq!("ZoneCrossing".parse::<ScenarioId>().unwrap(), ScenarioId::ZoneCrossing);
        assert!("time_warp".parse::<ScenarioId>().is_err());
    }
}
