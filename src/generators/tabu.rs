//! Tabu trajectory generator.
//!
//! Short-term memory over recently visited decision vectors: a FIFO tenure
//! queue plus a hash set for O(1) membership. Candidate selection filters
//! tabu neighbors; a fully tabu neighborhood is the recoverable
//! [`NeighborhoodExhausted`] condition, handled by regenerating a fresh
//! neighborhood from the current reference up to
//! [`TABU_REGENERATION_LIMIT`] times before escalating to a configuration
//! error.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing*
//! 1(3), 190-206.

use std::collections::{HashSet, VecDeque};

use log::trace;
use rand::{Rng, RngCore};

use super::{Generator, GeneratorKind};
use crate::error::{EngineError, NeighborhoodExhausted};
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Bound on neighborhood regenerations when every neighbor is tabu.
pub const TABU_REGENERATION_LIMIT: usize = 8;

/// Stable key for a decision vector, used for tabu membership.
fn move_key(code: &[f64]) -> String {
    let mut key = String::with_capacity(code.len() * 12);
    for (i, v) in code.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(&format!("{v:.9}"));
    }
    key
}

/// Drops tabu neighbors, failing when none remain.
pub(crate) fn admissible(
    neighbors: Vec<State>,
    tabu: &HashSet<String>,
) -> Result<Vec<State>, NeighborhoodExhausted> {
    let admissible: Vec<State> = neighbors
        .into_iter()
        .filter(|n| !tabu.contains(&move_key(n.code())))
        .collect();
    if admissible.is_empty() {
        Err(NeighborhoodExhausted)
    } else {
        Ok(admissible)
    }
}

/// Trajectory search with tabu memory.
///
/// Unlike the acceptance-policy trajectory variants, a tabu search always
/// moves to the chosen admissible neighbor, relying on the memory to avoid
/// cycling back. Operators are free to return pre-scored neighborhoods;
/// when every admissible neighbor carries an evaluation the move is the
/// greedy best, otherwise a uniform draw.
pub struct TabuGenerator {
    direction: Direction,
    tenure: usize,
    reference: Option<State>,
    queue: VecDeque<String>,
    set: HashSet<String>,
}

impl TabuGenerator {
    pub fn new(direction: Direction, tenure: usize) -> Self {
        Self {
            direction,
            tenure,
            reference: None,
            queue: VecDeque::new(),
            set: HashSet::new(),
        }
    }

    /// Number of moves currently held tabu.
    pub fn tabu_len(&self) -> usize {
        self.queue.len()
    }

    fn remember(&mut self, code: &[f64]) {
        if self.queue.len() >= self.tenure {
            if let Some(old) = self.queue.pop_front() {
                self.set.remove(&old);
            }
        }
        let key = move_key(code);
        self.queue.push_back(key.clone());
        self.set.insert(key);
    }
}

impl Generator for TabuGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::TabuSearch
    }

    fn initialize(
        &mut self,
        initial: &State,
        _codification: &dyn Codification,
        _ops: &dyn SearchOperator,
        _problem: &dyn Problem,
        _rng: &mut dyn RngCore,
    ) -> Result<(), EngineError> {
        self.reference = Some(initial.clone());
        self.queue.clear();
        self.set.clear();
        self.remember(initial.code());
        Ok(())
    }

    fn generate(
        &mut self,
        neighborhood_size: usize,
        _codification: &dyn Codification,
        ops: &dyn SearchOperator,
        rng: &mut dyn RngCore,
    ) -> Result<State, EngineError> {
        let reference = self.reference.as_ref().ok_or_else(|| {
            EngineError::InvariantViolation("generate called before initialize".into())
        })?;

        for attempt in 0..TABU_REGENERATION_LIMIT {
            let neighbors = ops.neighbors(reference, neighborhood_size.max(1), rng);
            if neighbors.is_empty() {
                return Err(EngineError::InvariantViolation(
                    "search operator produced an empty neighborhood".into(),
                ));
            }

            match admissible(neighbors, &self.set) {
                Ok(mut candidates) => {
                    // Greedy move: best admissible neighbor by the last objective.
                    // Unevaluated neighbors fall back to a uniform draw.
                    let evaluated = candidates.iter().all(|c| !c.evaluation().is_empty());
                    let idx = if evaluated {
                        let mut best = 0;
                        for i in 1..candidates.len() {
                            if self.direction.better(
                                candidates[i].last_objective(),
                                candidates[best].last_objective(),
                            ) {
                                best = i;
                            }
                        }
                        best
                    } else {
                        rng.random_range(0..candidates.len())
                    };
                    let mut candidate = candidates.swap_remove(idx);
                    candidate.set_origin(GeneratorKind::TabuSearch);
                    return Ok(candidate);
                }
                Err(NeighborhoodExhausted) => {
                    trace!(
                        "tabu neighborhood exhausted, regenerating (attempt {})",
                        attempt + 1
                    );
                }
            }
        }

        Err(EngineError::Configuration(format!(
            "tabu neighborhood still exhausted after {TABU_REGENERATION_LIMIT} regenerations"
        )))
    }

    fn update_reference(&mut self, candidate: &State, _iteration: u64, _rng: &mut dyn RngCore) {
        // Always move; the accepted move becomes tabu.
        self.remember(candidate.code());
        self.reference = Some(candidate.clone());
    }

    fn reference(&self) -> Option<&State> {
        self.reference.as_ref()
    }

    fn reference_list(&self) -> &[State] {
        match &self.reference {
            Some(reference) => std::slice::from_ref(reference),
            None => &[],
        }
    }

    fn reevaluate(&mut self, problem: &dyn Problem) {
        if let Some(reference) = &mut self.reference {
            problem.evaluate(reference);
        }
    }

    fn reset(&mut self) {
        self.reference = None;
        self.queue.clear();
        self.set.clear();
    }
}
