//! Per-round aggregate statistics
//!
//! The engine only counts strategies. Tables and plots are built by
//! whatever consumes a [`StatisticsSink`].

use serde::{Deserialize, Serialize};

/// Strategy counts after a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    /// Rounds completed when the counts were taken (0 = initial state)
    pub round: u32,
    pub cooperators: u32,
    pub defectors: u32,
}

impl RoundStats {
    pub fn total(&self) -> u32 {
        self.cooperators + self.defectors
    }
}

/// Receives one record per completed round
pub trait StatisticsSink {
    fn record(&mut self, stats: RoundStats);
}

impl StatisticsSink for Vec<RoundStats> {
    fn record(&mut self, stats: RoundStats) {
        self.push(stats);
    }
}

/// In-memory collector with column views for plotting
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    pub rounds: Vec<RoundStats>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cooperator_series(&self) -> Vec<u32> {
        self.rounds.iter().map(|r| r.cooperators).collect()
    }

    pub fn defector_series(&self) -> Vec<u32> {
        self.rounds.iter().map(|r| r.defectors).collect()
    }

    pub fn last(&self) -> Option<&RoundStats> {
        self.rounds.last()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl StatisticsSink for History {
    fn record(&mut self, stats: RoundStats) {
        self.rounds.push(stats);
    }
}
