//! Spatial Prisoner's Dilemma
//!
//! Agents scattered over a 2-D grid play a one-shot Prisoner's Dilemma
//! against every agent in their Moore neighborhood, then switch strategy
//! based on the payoff they collected during the round.
//!
//! This crate is compiled to:
//! - Native (for the `spatial-arena` driver)
//! - WASM (for browser-side replay, behind the `wasm` feature)

mod random;
mod strategy;
mod grid;
mod agent;
mod simulation;
mod stats;
mod config;
mod error;

#[cfg(feature = "wasm")]
mod wasm;

pub use random::SeededRng;
pub use strategy::Strategy;
pub use grid::{Grid, Position, Topology};
pub use agent::{Agent, AgentId, COOPERATION_THRESHOLD};
pub use simulation::Simulation;
pub use stats::{History, RoundStats, StatisticsSink};
pub use config::{PairCounting, SimConfig, MAX_CELLS};
pub use error::SimulationError;

/// Temptation to defect against a cooperator
pub const TEMPTATION: u32 = 3;
/// Reward for mutual cooperation
pub const REWARD: u32 = 2;
/// Punishment for mutual defection
pub const PUNISHMENT: u32 = 1;
/// Sucker's payoff for cooperating with a defector
pub const SUCKER: u32 = 0;

/// Payoff matrix for the Prisoner's Dilemma
/// Returns (my_payoff, opponent_payoff)
pub fn payoff(mine: Strategy, theirs: Strategy) -> (u32, u32) {
    match (mine, theirs) {
        (Strategy::Cooperate, Strategy::Cooperate) => (REWARD, REWARD),
        (Strategy::Cooperate, Strategy::Defect) => (SUCKER, TEMPTATION),
        (Strategy::Defect, Strategy::Cooperate) => (TEMPTATION, SUCKER),
        (Strategy::Defect, Strategy::Defect) => (PUNISHMENT, PUNISHMENT),
    }
}
