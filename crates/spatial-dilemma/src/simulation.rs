//! Round execution engine
//!
//! A round is two full passes over the agents: every agent plays its
//! neighbors, and only then does every agent pick its next strategy.

use tracing::{debug, trace};
use crate::agent::{Agent, AgentId};
use crate::config::{PairCounting, SimConfig};
use crate::error::SimulationError;
use crate::grid::Grid;
use crate::random::SeededRng;
use crate::stats::{RoundStats, StatisticsSink};
use crate::strategy::Strategy;

#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    /// Activation order; `agents[i].id == i`
    agents: Vec<Agent>,
    round: u32,
}

/// Borrow two distinct agents mutably
fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> (&mut Agent, &mut Agent) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

impl Simulation {
    /// Build a simulation with random strategies and positions
    ///
    /// For each agent in id order a strategy is drawn, then an x and a y
    /// coordinate, all from one generator seeded with `config.seed`.
    /// Several agents may land on the same cell.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut rng = SeededRng::new(config.seed);
        let mut grid = Grid::new(config.width, config.height, config.topology);
        let mut agents = Vec::with_capacity(config.population as usize);

        for id in 0..config.population {
            let strategy = Strategy::random(&mut rng);
            let x = rng.next_range(config.width);
            let y = rng.next_range(config.height);
            grid.place(id, x, y)?;
            agents.push(Agent::new(id, strategy));
        }

        debug!(
            width = config.width,
            height = config.height,
            population = config.population,
            seed = config.seed,
            "Simulation initialized"
        );

        Ok(Self { config, grid, agents, round: 0 })
    }

    /// Build a simulation from explicit `(strategy, x, y)` placements
    ///
    /// Agent ids follow the order of `placements`; `config.population` and
    /// `config.seed` are ignored.
    pub fn with_agents(
        config: SimConfig,
        placements: &[(Strategy, u32, u32)],
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let population = u32::try_from(placements.len()).map_err(|_| {
            SimulationError::InvalidConfiguration("too many agents".to_string())
        })?;
        let mut grid = Grid::new(config.width, config.height, config.topology);
        let mut agents = Vec::with_capacity(placements.len());

        for (id, &(strategy, x, y)) in (0..population).zip(placements) {
            grid.place(id, x, y)?;
            agents.push(Agent::new(id, strategy));
        }

        Ok(Self {
            config: SimConfig { population, ..config },
            grid,
            agents,
            round: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id as usize)
    }

    /// Rounds completed so far
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Every agent plays each agent in its Moore neighborhood
    pub fn play_phase(&mut self) {
        for i in 0..self.agents.len() {
            let id = self.agents[i].id;
            let Some(pos) = self.grid.position_of(id) else {
                continue;
            };

            for neighbor in self.grid.neighbors(pos.x, pos.y) {
                if self.config.pair_counting == PairCounting::Once && neighbor < id {
                    continue;
                }
                let j = neighbor as usize;
                if j == i {
                    continue;
                }
                let (actor, opponent) = pair_mut(&mut self.agents, i, j);
                actor.play(opponent);
            }
        }
    }

    /// Every agent updates its strategy from the payoff it collected
    pub fn advance_phase(&mut self) {
        for agent in &mut self.agents {
            agent.advance();
        }
    }

    /// Current strategy counts
    pub fn census(&self) -> RoundStats {
        let cooperators = self
            .agents
            .iter()
            .filter(|a| a.strategy == Strategy::Cooperate)
            .count() as u32;

        RoundStats {
            round: self.round,
            cooperators,
            defectors: self.agents.len() as u32 - cooperators,
        }
    }

    /// Run one round and return the counts after it
    pub fn step(&mut self) -> RoundStats {
        self.play_phase();
        self.advance_phase();
        self.round += 1;

        let stats = self.census();
        trace!(
            round = stats.round,
            cooperators = stats.cooperators,
            defectors = stats.defectors,
            "Round complete"
        );
        stats
    }

    /// Run one round and hand its counts to `sink`
    pub fn step_into<S: StatisticsSink + ?Sized>(&mut self, sink: &mut S) -> RoundStats {
        let stats = self.step();
        sink.record(stats);
        stats
    }

    /// Run `rounds` rounds, recording each one
    pub fn run<S: StatisticsSink + ?Sized>(&mut self, rounds: u32, sink: &mut S) {
        for _ in 0..rounds {
            self.step_into(sink);
        }
        debug!(rounds, total = self.round, "Run finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Topology;
    use crate::stats::History;
    use proptest::{prop_assert, prop_assert_eq, proptest};

    fn config(width: u32, height: u32) -> SimConfig {
        SimConfig { width, height, ..SimConfig::default() }
    }

    #[test]
    fn test_two_cooperators_double_count() {
        let mut sim = Simulation::with_agents(
            config(2, 1),
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 1, 0)],
        )
        .unwrap();

        sim.play_phase();
        // Each side plays the shared edge once: R + R
        assert_eq!(sim.agent(0).unwrap().payoff, 4);
        assert_eq!(sim.agent(1).unwrap().payoff, 4);

        sim.advance_phase();
        assert!(sim.agents().iter().all(|a| a.strategy == Strategy::Cooperate));
    }

    #[test]
    fn test_two_cooperators_single_count() {
        let cfg = SimConfig { pair_counting: PairCounting::Once, ..config(2, 1) };
        let mut sim = Simulation::with_agents(
            cfg,
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 1, 0)],
        )
        .unwrap();

        sim.play_phase();
        assert_eq!(sim.agent(0).unwrap().payoff, 2);
        assert_eq!(sim.agent(1).unwrap().payoff, 2);

        sim.advance_phase();
        let stats = sim.census();
        assert_eq!(stats.defectors, 2);
    }

    #[test]
    fn test_single_count_step_defects() {
        let cfg = SimConfig { pair_counting: PairCounting::Once, ..config(2, 1) };
        let mut sim = Simulation::with_agents(
            cfg,
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 1, 0)],
        )
        .unwrap();

        let stats = sim.step();
        assert_eq!(stats, RoundStats { round: 1, cooperators: 0, defectors: 2 });
    }

    #[test]
    fn test_step_reports_counts() {
        let mut sim = Simulation::with_agents(
            config(2, 1),
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 1, 0)],
        )
        .unwrap();

        let stats = sim.step();

        assert_eq!(stats, RoundStats { round: 1, cooperators: 2, defectors: 0 });
        assert_eq!(sim.round(), 1);
    }

    #[test]
    fn test_play_completes_before_advance() {
        // A naive play-then-advance per agent would flip agent 0 to Defect
        // before agent 1 plays it.
        let mut sim = Simulation::with_agents(
            config(3, 1),
            &[
                (Strategy::Cooperate, 0, 0),
                (Strategy::Cooperate, 1, 0),
                (Strategy::Defect, 2, 0),
            ],
        )
        .unwrap();

        sim.play_phase();
        let payoffs: Vec<u32> = sim.agents().iter().map(|a| a.payoff).collect();
        assert_eq!(payoffs, vec![4, 4, 6]);

        sim.advance_phase();
        assert_eq!(sim.census().cooperators, 3);
    }

    #[test]
    fn test_isolated_agent_defects() {
        let mut sim = Simulation::with_agents(
            config(10, 10),
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 5, 5)],
        )
        .unwrap();

        sim.play_phase();
        assert!(sim.agents().iter().all(|a| a.payoff == 0));

        sim.advance_phase();
        assert!(sim.agents().iter().all(|a| a.strategy == Strategy::Defect));
    }

    #[test]
    fn test_shared_cell_agents_do_not_play() {
        let mut sim = Simulation::with_agents(
            config(3, 3),
            &[(Strategy::Cooperate, 1, 1), (Strategy::Cooperate, 1, 1)],
        )
        .unwrap();

        sim.play_phase();
        assert!(sim.agents().iter().all(|a| a.payoff == 0));
    }

    #[test]
    fn test_payoff_reset_after_advance() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();

        sim.play_phase();
        assert!(sim.agents().iter().any(|a| a.payoff > 0));

        sim.advance_phase();
        assert!(sim.agents().iter().all(|a| a.payoff == 0));
    }

    #[test]
    fn test_new_places_every_agent() {
        let sim = Simulation::new(SimConfig::default()).unwrap();

        assert_eq!(sim.agents().len(), 50);
        assert_eq!(sim.grid().len(), 50);
        for agent in sim.agents() {
            let pos = sim.grid().position_of(agent.id).unwrap();
            assert!(pos.x < 10 && pos.y < 10);
            assert_eq!(agent.payoff, 0);
        }
    }

    #[test]
    fn test_empty_population() {
        let cfg = SimConfig { population: 0, ..SimConfig::default() };
        let mut sim = Simulation::new(cfg).unwrap();

        let stats = sim.step();
        assert_eq!(stats, RoundStats { round: 1, cooperators: 0, defectors: 0 });
    }

    #[test]
    fn test_invalid_configuration_fails() {
        let cfg = SimConfig { width: 0, ..SimConfig::default() };
        assert!(matches!(
            Simulation::new(cfg),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let cfg = SimConfig::from_json(r#"{"width": 4294967295, "height": 4294967295, "population": 1}"#);
        assert!(matches!(cfg, Err(SimulationError::InvalidConfiguration(_))));

        let cfg = SimConfig { width: u32::MAX, height: u32::MAX, ..SimConfig::default() };
        assert!(matches!(
            Simulation::new(cfg.clone()),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Simulation::with_agents(cfg, &[]),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_with_agents_out_of_bounds() {
        let result = Simulation::with_agents(config(2, 2), &[(Strategy::Defect, 2, 0)]);
        assert!(matches!(result, Err(SimulationError::OutOfBounds { .. })));
    }

    #[test]
    fn test_reproducible_runs() {
        let cfg = SimConfig { seed: 1234, ..SimConfig::default() };

        let mut first = History::new();
        let mut second = History::new();
        Simulation::new(cfg.clone()).unwrap().run(100, &mut first);
        Simulation::new(cfg).unwrap().run(100, &mut second);

        assert_eq!(first.rounds, second.rounds);
        assert_eq!(first.rounds.len(), 100);
    }

    #[test]
    fn test_run_round_indices() {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        let mut sink: Vec<RoundStats> = Vec::new();

        assert_eq!(sim.census().round, 0);
        sim.run(5, &mut sink);

        let rounds: Vec<u32> = sink.iter().map(|r| r.round).collect();
        assert_eq!(rounds, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_torus_pairs_across_edge() {
        let cfg = SimConfig { topology: Topology::Torus, ..config(10, 10) };
        let mut sim = Simulation::with_agents(
            cfg,
            &[(Strategy::Cooperate, 0, 0), (Strategy::Cooperate, 9, 9)],
        )
        .unwrap();

        sim.play_phase();
        assert_eq!(sim.agent(0).unwrap().payoff, 4);
    }

    proptest! {
        #[test]
        fn test_population_conserved(
            seed in 0u64..10_000,
            width in 1u32..12,
            height in 1u32..12,
            population in 0u32..80,
        ) {
            let cfg = SimConfig { width, height, population, seed, ..SimConfig::default() };
            let mut sim = Simulation::new(cfg).unwrap();
            let mut sink: Vec<RoundStats> = Vec::new();
            sim.run(10, &mut sink);

            for stats in &sink {
                prop_assert_eq!(stats.total(), population);
            }
            prop_assert_eq!(sim.grid().len(), population as usize);
            prop_assert!(sim.agents().iter().all(|a| a.payoff == 0));
        }
    }
}
