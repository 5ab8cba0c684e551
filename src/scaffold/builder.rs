use std::sync::Arc;

use super::lattice::LatticeGraph;
use super::linkage::Linkage;
use super::model::{Arrow, AssemblyModel};

/// Maximum total chain units in one assembly (pentamer scale).
pub const DEFAULT_BUDGET: u32 = 5;

/// A slot stops responding to clicks once both of its upward sources
/// have been consumed.
const SLOT_CAP: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Building,
    Full,
}

/// Immutable snapshot of an interactive build. `select` returns a new
/// state instead of mutating, so a rejected click provably changes
/// nothing and sequences of transitions are easy to test.
#[derive(Clone, Debug, PartialEq)]
pub struct BuilderState {
    /// Activation count per slot, indexed by slot id.
    pub activations: Vec<u32>,
    pub arrows: Vec<Arrow>,
    /// Activated slot ids in activation order. `select` scans this when
    /// choosing an arrow source; the last qualifying id wins. A slot is
    /// listed once no matter how often it is reused.
    pub activated: Vec<usize>,
    pub total: u32,
}

impl BuilderState {
    /// Root slot pre-activated, nothing else.
    pub fn initial(slots: usize) -> Self {
        let mut activations = vec![0; slots];
        let mut activated = Vec::new();
        let mut total = 0;
        if !activations.is_empty() {
            activations[0] = 1;
            activated.push(0);
            total = 1;
        }
        Self {
            activations,
            arrows: Vec::new(),
            activated,
            total,
        }
    }

    pub fn phase(&self, budget: u32) -> Phase {
        if self.total >= budget {
            Phase::Full
        } else if self.total <= 1 {
            Phase::Idle
        } else {
            Phase::Building
        }
    }

    /// One click on `target`. Returns the successor state, or `None` when
    /// the click is rejected: budget exhausted, slot already at its cap,
    /// or no activated slot below it can source a new arrow.
    pub fn select(&self, lattice: &LatticeGraph, budget: u32, target: usize) -> Option<Self> {
        if target >= lattice.len() {
            return None;
        }
        if self.total >= budget || self.activations[target] >= SLOT_CAP {
            return None;
        }

        let target_pos = lattice.pos(target);
        let mut source = None;
        for &prev in &self.activated {
            let above = target_pos.y < lattice.pos(prev).y;
            let duplicate = self
                .arrows
                .iter()
                .any(|arrow| arrow.from == prev && arrow.to == target);
            if lattice.adjacent(prev, target) && above && !duplicate {
                // Last qualifying source in activation order wins.
                source = Some(prev);
            }
        }
        let source = source?;

        let mut next = self.clone();
        next.activations[target] += 1;
        if !next.activated.contains(&target) {
            next.activated.push(target);
        }
        next.arrows.push(Arrow {
            from: source,
            to: target,
            linkage: Some(Linkage::classify(lattice.pos(source), target_pos)),
        });
        next.total += 1;
        Some(next)
    }
}

/// Stateful wrapper the UI drives. All mutation funnels through the pure
/// `BuilderState::select` transition; no I/O, no logging, and rejected
/// clicks are silent no-ops.
pub struct ChainBuilder {
    lattice: Arc<LatticeGraph>,
    budget: u32,
    state: BuilderState,
}

impl ChainBuilder {
    pub fn new(lattice: Arc<LatticeGraph>, budget: u32) -> Self {
        let state = BuilderState::initial(lattice.len());
        Self {
            lattice,
            budget,
            state,
        }
    }

    pub fn lattice(&self) -> &LatticeGraph {
        &self.lattice
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn remaining(&self) -> u32 {
        self.budget.saturating_sub(self.state.total)
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase(self.budget)
    }

    /// Applies one click; returns false when it was rejected.
    pub fn select(&mut self, target: usize) -> bool {
        match self.state.select(&self.lattice, self.budget, target) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Back to the constructor state: root activated, nothing else.
    pub fn reset(&mut self) {
        self.state = BuilderState::initial(self.lattice.len());
    }

    /// Snapshot in the shared renderer shape.
    pub fn model(&self) -> AssemblyModel {
        AssemblyModel {
            activations: self.state.activations.clone(),
            arrows: self.state.arrows.clone(),
            markers: Vec::new(),
        }
    }
}
