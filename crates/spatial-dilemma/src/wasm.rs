//! WASM bindings for browser-side simulation replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{payoff, History, SimConfig, Simulation, StatisticsSink, Strategy};

/// Run a simulation and return its strategy counts
///
/// # Arguments
/// * `config_json` - JSON serialized SimConfig (missing fields use defaults)
/// * `rounds` - Number of rounds to run
///
/// # Returns
/// JSON serialized History: the initial census followed by one record per round
#[wasm_bindgen]
pub fn run_simulation(config_json: &str, rounds: u32) -> Result<JsValue, JsError> {
    let config = SimConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    let mut sim = Simulation::new(config)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let mut history = History::new();
    history.record(sim.census());
    sim.run(rounds, &mut history);

    serde_wasm_bindgen::to_value(&history)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct PayoffEntry {
    mine: Strategy,
    theirs: Strategy,
    my_payoff: u32,
    their_payoff: u32,
}

/// Get the full payoff table
#[wasm_bindgen]
pub fn payoff_table() -> Result<JsValue, JsError> {
    let strategies = [Strategy::Cooperate, Strategy::Defect];
    let table: Vec<PayoffEntry> = strategies
        .iter()
        .flat_map(|&mine| {
            strategies.iter().map(move |&theirs| {
                let (my_payoff, their_payoff) = payoff(mine, theirs);
                PayoffEntry { mine, theirs, my_payoff, their_payoff }
            })
        })
        .collect();

    serde_wasm_bindgen::to_value(&table)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
