//! Error types for simulation construction

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Grid dimensions or population rejected at construction
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Placement outside the grid. Initialization never draws such a
    /// coordinate, so hitting this means a caller broke the grid contract.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Configuration text that is not valid JSON
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
}
