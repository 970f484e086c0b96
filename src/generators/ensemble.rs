//! Ensemble (hyper-heuristic) generator.
//!
//! Holds a fixed list of sub-generators and delegates each iteration to one
//! "active" sub-generator chosen by weight-proportional roulette. Credit
//! assignment is recomputed per sub-period rather than carried forward:
//! at every sub-period boundary the usage/success counters are flushed into
//! fixed-size period bucket arrays and every weight snaps back to
//! [`WEIGHT_BASELINE`], so an early leader cannot run away on stale
//! evidence. During a sub-period each improvement credited to the active
//! sub-generator adds [`SUCCESS_CREDIT`] to its weight.
//!
//! An ensemble never contains another ensemble and never assigns itself a
//! weight; the roster holds only leaf strategies.

use log::{debug, trace};
use rand::{Rng, RngCore};

use super::{Generator, GeneratorKind};
use crate::error::EngineError;
use crate::problem::{Codification, Problem, SearchOperator};
use crate::state::{Direction, State};

/// Baseline every sub-generator weight is reset to at sub-period boundaries.
pub const WEIGHT_BASELINE: f64 = 50.0;

/// Number of per-period history buckets kept per sub-generator.
pub const PERIOD_BUCKETS: usize = 10;

/// Weight added to the active sub-generator per credited improvement.
pub const SUCCESS_CREDIT: f64 = 1.0;

/// Weight-proportional index selection.
///
/// A non-positive weight total (a numeric edge case, not an error) falls
/// back to a uniform draw.
fn roulette(weights: &[f64], rng: &mut dyn RngCore) -> usize {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return rng.random_range(0..weights.len());
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        roll -= w;
        if roll <= 0.0 {
            return i;
        }
    }
    weights.len() - 1 // floating-point fallthrough
}

/// Adaptive ensemble over a fixed roster of sub-generators.
#[derive(Debug)]
pub struct EnsembleGenerator {
    direction: Direction,
    children: Vec<Box<dyn Generator>>,
    weights: Vec<f64>,
    uses: Vec<u64>,
    successes: Vec<u64>,
    use_buckets: Vec<[u64; PERIOD_BUCKETS]>,
    success_buckets: Vec<[u64; PERIOD_BUCKETS]>,
    bucket_cursor: usize,
    active: Option<usize>,
    child_best: Vec<Option<f64>>,
}

impl EnsembleGenerator {
    /// Builds an ensemble over `children`. The roster must be non-empty and
    /// must not contain another ensemble.
    pub fn new(
        direction: Direction,
        children: Vec<Box<dyn Generator>>,
    ) -> Result<Self, EngineError> {
        if children.is_empty() {
            return Err(EngineError::Configuration(
                "ensemble roster must not be empty".into(),
            ));
        }
        if children.iter().any(|c| c.kind() == GeneratorKind::Ensemble) {
            return Err(EngineError::Configuration(
                "an ensemble may not contain another ensemble".into(),
            ));
        }

        let n = children.len();
        Ok(Self {
            direction,
            children,
            weights: vec![WEIGHT_BASELINE; n],
            uses: vec![0; n],
            successes: vec![0; n],
            use_buckets: vec![[0; PERIOD_BUCKETS]; n],
            success_buckets: vec![[0; PERIOD_BUCKETS]; n],
            bucket_cursor: 0,
            active: None,
            child_best: vec![None; n],
        })
    }

    /// Current selection weights, index-aligned with the roster.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Index of the currently active sub-generator.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Family tags of the roster, in order.
    pub fn roster(&self) -> Vec<GeneratorKind> {
        self.children.iter().map(|c| c.kind()).collect()
    }

    /// Flushed per-period usage counts for the sub-generator at `index`.
    pub fn usage_history(&self, index: usize) -> &[u64; PERIOD_BUCKETS] {
        &self.use_buckets[index]
    }

    /// Flushed per-period success counts for the sub-generator at `index`.
    pub fn success_history(&self, index: usize) -> &[u64; PERIOD_BUCKETS] {
        &self.success_buckets[index]
    }
}

impl Generator for EnsembleGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Ensemble
    }

    fn initialize(
        &mut self,
        initial: &State,
        codification: &dyn Codification,
        ops: &dyn SearchOperator,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EngineError> {
        for child in &mut self.children {
            child.initialize(initial, codification, ops, problem, rng)?;
        }

        let n = self.children.len();
        self.weights = vec![WEIGHT_BASELINE; n];
        self.uses = vec![0; n];
        self.successes = vec![0; n];
        self.use_buckets = vec![[0; PERIOD_BUCKETS]; n];
        self.success_buckets = vec![[0; PERIOD_BUCKETS]; n];
        self.bucket_cursor = 0;
        self.child_best = vec![Some(initial.last_objective()); n];
        self.active = Some(roulette(&self.weights, rng));
        Ok(())
    }

    fn begin_iteration(&mut self, rng: &mut dyn RngCore) {
        let idx = roulette(&self.weights, rng);
        if self.active != Some(idx) {
            trace!("ensemble hand-off to sub-generator {idx}");
        }
        self.active = Some(idx);
    }

    fn on_subperiod(&mut self, _rng: &mut dyn RngCore) {
        for i in 0..self.children.len() {
            self.use_buckets[i][self.bucket_cursor] = self.uses[i];
            self.success_buckets[i][self.bucket_cursor] = self.successes[i];
        }
        self.bucket_cursor = (self.bucket_cursor + 1) % PERIOD_BUCKETS;

        debug!(
            "ensemble sub-period flush: uses={:?} successes={:?}",
            self.uses, self.successes
        );

        // Credit is recomputed per sub-period: counters clear and every
        // weight snaps back to the baseline before new evidence arrives.
        for i in 0..self.children.len() {
            self.uses[i] = 0;
            self.successes[i] = 0;
            self.weights[i] = WEIGHT_BASELINE;
        }
    }

    fn generate(
        &mut self,
        neighborhood_size: usize,
        codification: &dyn Codification,
        ops: &dyn SearchOperator,
        rng: &mut dyn RngCore,
    ) -> Result<State, EngineError> {
        let idx = self.active.ok_or_else(|| {
            EngineError::InvariantViolation("ensemble has no active sub-generator".into())
        })?;
        self.children[idx].generate(neighborhood_size, codification, ops, rng)
    }

    fn update_reference(&mut self, candidate: &State, iteration: u64, rng: &mut dyn RngCore) {
        let Some(idx) = self.active else {
            return;
        };

        self.children[idx].update_reference(candidate, iteration, rng);
        self.uses[idx] += 1;

        let objective = candidate.last_objective();
        let improved = match self.child_best[idx] {
            None => true,
            Some(best) => self.direction.better(objective, best),
        };
        if improved {
            self.successes[idx] += 1;
            self.weights[idx] += SUCCESS_CREDIT;
            self.child_best[idx] = Some(objective);
        }
    }

    fn reference(&self) -> Option<&State> {
        self.active.and_then(|idx| self.children[idx].reference())
    }

    fn reference_list(&self) -> &[State] {
        match self.active {
            Some(idx) => self.children[idx].reference_list(),
            None => &[],
        }
    }

    fn reevaluate(&mut self, problem: &dyn Problem) {
        for child in &mut self.children {
            child.reevaluate(problem);
        }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
        let n = self.children.len();
        self.weights = vec![WEIGHT_BASELINE; n];
        self.uses = vec![0; n];
        self.successes = vec![0; n];
        self.use_buckets = vec![[0; PERIOD_BUCKETS]; n];
        self.success_buckets = vec![[0; PERIOD_BUCKETS]; n];
        self.bucket_cursor = 0;
        self.active = None;
        self.child_best = vec![None; n];
    }
}
