//! Simulation configuration

use serde::{Deserialize, Serialize};
use crate::error::SimulationError;
use crate::grid::Topology;

/// How often an adjacent pair is played within a round
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairCounting {
    /// Every agent plays all of its neighbors, so each adjacent pair is
    /// played twice per round (once from each side). The cooperation
    /// threshold is calibrated against this.
    #[default]
    EachSide,
    /// Each unordered pair is played once; the agent with the lower id acts.
    Once,
}

/// Largest grid, in cells, a simulation will allocate
pub const MAX_CELLS: u64 = 1 << 24;

/// Parameters consumed by [`crate::Simulation::new`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells (must be positive)
    pub width: u32,
    /// Grid height in cells (must be positive)
    pub height: u32,
    /// Number of agents; zero yields an empty simulation
    pub population: u32,
    /// Seed for strategy and position draws
    pub seed: u64,
    pub topology: Topology,
    pub pair_counting: PairCounting,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            population: 50,
            seed: 42,
            topology: Topology::Bounded,
            pair_counting: PairCounting::EachSide,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "grid width must be positive".to_string(),
            ));
        }
        if self.height == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "grid height must be positive".to_string(),
            ));
        }
        let cells = u64::from(self.width) * u64::from(self.height);
        if cells > MAX_CELLS {
            return Err(SimulationError::InvalidConfiguration(format!(
                "grid of {}x{} exceeds {} cells",
                self.width, self.height, MAX_CELLS
            )));
        }
        Ok(())
    }
}
