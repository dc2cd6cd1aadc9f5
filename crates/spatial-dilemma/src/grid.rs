//! Multi-occupancy grid with Moore-neighborhood queries
//!
//! Cells are stored row-major. The grid is the authority on where each
//! agent sits; agents themselves only carry their id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use crate::agent::AgentId;
use crate::error::SimulationError;

/// Edge behaviour of the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    /// Cells past an edge do not exist; edge and corner cells have fewer
    /// than 8 neighbors.
    #[default]
    Bounded,
    /// Both axes wrap around.
    Torus,
}

/// A cell coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    topology: Topology,
    cells: Vec<Vec<AgentId>>,
    positions: HashMap<AgentId, Position>,
}

impl Grid {
    pub fn new(width: u32, height: u32, topology: Topology) -> Self {
        Self {
            width,
            height,
            topology,
            cells: vec![Vec::new(); width as usize * height as usize],
            positions: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of placed agents
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Record that `agent` occupies cell (x, y)
    ///
    /// Several agents may share a cell. Placing an agent that is already on
    /// the grid moves it.
    pub fn place(&mut self, agent: AgentId, x: u32, y: u32) -> Result<(), SimulationError> {
        if x >= self.width || y >= self.height {
            return Err(SimulationError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        if let Some(old) = self.positions.insert(agent, Position { x, y }) {
            let i = self.idx(old.x, old.y);
            self.cells[i].retain(|id| *id != agent);
        }
        let i = self.idx(x, y);
        self.cells[i].push(agent);
        Ok(())
    }

    pub fn position_of(&self, agent: AgentId) -> Option<Position> {
        self.positions.get(&agent).copied()
    }

    /// Agents on cell (x, y), in placement order. Empty when out of range.
    pub fn agents_at(&self, x: u32, y: u32) -> &[AgentId] {
        if x >= self.width || y >= self.height {
            return &[];
        }
        &self.cells[self.idx(x, y)]
    }

    /// Map an offset cell onto the grid, or None when it falls off a
    /// bounded edge
    fn resolve(&self, x: i64, y: i64) -> Option<Position> {
        let (w, h) = (self.width as i64, self.height as i64);
        match self.topology {
            Topology::Bounded => {
                if x < 0 || y < 0 || x >= w || y >= h {
                    return None;
                }
                Some(Position { x: x as u32, y: y as u32 })
            }
            Topology::Torus => Some(Position {
                x: x.rem_euclid(w) as u32,
                y: y.rem_euclid(h) as u32,
            }),
        }
    }

    /// Distinct Moore cells around (x, y), never including (x, y) itself
    ///
    /// On a torus narrower than 3 cells several offsets land on the same
    /// cell (or back on the centre); each cell is reported once.
    pub fn neighborhood(&self, x: u32, y: u32) -> Vec<Position> {
        let center = Position { x, y };
        let mut out: Vec<Position> = Vec::with_capacity(MOORE_OFFSETS.len());
        for (dx, dy) in MOORE_OFFSETS {
            if let Some(pos) = self.resolve(x as i64 + dx, y as i64 + dy) {
                if pos != center && !out.contains(&pos) {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// Every agent in the Moore neighborhood of (x, y), centre excluded
    pub fn neighbors(&self, x: u32, y: u32) -> Vec<AgentId> {
        self.neighborhood(x, y)
            .into_iter()
            .flat_map(|p| self.agents_at(p.x, p.y).iter().copied())
            .collect()
    }
}
