//! Strategy definitions

use serde::{Deserialize, Serialize};
use crate::random::SeededRng;

/// An agent's current choice in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Cooperate,
    Defect,
}

impl Strategy {
    /// Draw a strategy uniformly at random
    pub fn random(rng: &mut SeededRng) -> Self {
        if rng.next_bool() {
            Strategy::Cooperate
        } else {
            Strategy::Defect
        }
    }
}
