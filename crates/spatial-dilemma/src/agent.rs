//! Prisoner agents

use serde::{Deserialize, Serialize};
use crate::payoff;
use crate::strategy::Strategy;

/// Unique, stable agent identity. Also the agent's index in the
/// simulation's activation order.
pub type AgentId = u32;

/// Payoff an agent must collect within a round to cooperate next round
pub const COOPERATION_THRESHOLD: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub strategy: Strategy,
    /// Payoff collected so far this round
    pub payoff: u32,
}

impl Agent {
    pub fn new(id: AgentId, strategy: Strategy) -> Self {
        Self { id, strategy, payoff: 0 }
    }

    /// Play one Prisoner's Dilemma against `opponent`, crediting both sides
    pub fn play(&mut self, opponent: &mut Agent) {
        let (mine, theirs) = payoff(self.strategy, opponent.strategy);
        self.payoff += mine;
        opponent.payoff += theirs;
    }

    /// Pick next round's strategy from this round's payoff, then reset it
    ///
    /// The threshold is fixed, so an agent without neighbors always ends up
    /// defecting.
    pub fn advance(&mut self) {
        self.strategy = if self.payoff >= COOPERATION_THRESHOLD {
            Strategy::Cooperate
        } else {
            Strategy::Defect
        };
        self.payoff = 0;
    }
}
